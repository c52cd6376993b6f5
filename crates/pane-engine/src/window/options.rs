use winit::dpi::PhysicalSize;

use super::WindowError;

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub visible: bool,
    pub decorations: bool,
    pub maximized: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    pub min_size: Option<PhysicalSize<u32>>,
    pub max_size: Option<PhysicalSize<u32>>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "pane".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            visible: true,
            decorations: true,
            maximized: false,
            transparent: false,
            always_on_top: false,
            min_size: None,
            max_size: None,
        }
    }
}

impl WindowOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_decorations(mut self, decorations: bool) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn with_min_size(mut self, width: u32, height: u32) -> Self {
        self.min_size = Some(PhysicalSize::new(width, height));
        self
    }

    pub fn with_max_size(mut self, width: u32, height: u32) -> Self {
        self.max_size = Some(PhysicalSize::new(width, height));
        self
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }
}

/// RGBA8 window icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowIcon {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl WindowIcon {
    /// Validates that `rgba` holds exactly `width * height` RGBA pixels.
    pub fn from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Result<Self, WindowError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(WindowError::operation(
                "set_icon",
                format!(
                    "icon of {width}x{height} needs {expected} bytes, got {}",
                    rgba.len()
                ),
            ));
        }
        Ok(Self {
            rgba,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, u32, u32) {
        (self.rgba, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_800_by_600_visible_window() {
        let o = WindowOptions::default();
        assert_eq!(o.size(), PhysicalSize::new(800, 600));
        assert!(o.visible && o.resizable && o.decorations);
        assert!(!o.maximized && !o.transparent && !o.always_on_top);
    }

    #[test]
    fn builder_overrides() {
        let o = WindowOptions::new("Test")
            .with_size(320, 240)
            .with_resizable(false)
            .with_min_size(100, 100);
        assert_eq!(o.title, "Test");
        assert_eq!(o.size(), PhysicalSize::new(320, 240));
        assert!(!o.resizable);
        assert_eq!(o.min_size, Some(PhysicalSize::new(100, 100)));
        assert_eq!(o.max_size, None);
    }

    #[test]
    fn icon_rejects_wrong_buffer_length() {
        assert!(WindowIcon::from_rgba(vec![0; 16], 2, 2).is_ok());
        assert!(WindowIcon::from_rgba(vec![0; 15], 2, 2).is_err());
        assert!(WindowIcon::from_rgba(vec![], 0, 0).is_err());
    }
}
