use owo_colors::{OwoColorize, Style as OwoStyle};

/// Styles CLI output; every method returns plain text when colour is off.
#[derive(Debug)]
pub(crate) struct Painter {
    use_colour: bool,
}

impl Painter {
    pub(crate) fn new(use_colour: bool) -> Self {
        Self { use_colour }
    }

    pub(crate) fn heading<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold().cyan())
    }

    /// Label printed in front of every write `setup` made.
    pub(crate) fn applied(&self) -> String {
        self.paint("Applied", OwoStyle::new().bold().green())
    }

    /// `on` in green or `off` dimmed.
    pub(crate) fn power(&self, on: bool) -> String {
        if on {
            self.paint("on", OwoStyle::new().bold().green())
        } else {
            self.muted("off")
        }
    }

    /// Codes the device reported that no table knows.
    pub(crate) fn unknown(&self, detail: impl std::fmt::Display) -> String {
        self.paint(&format!("unknown ({detail})"), OwoStyle::new().bold().yellow())
    }

    pub(crate) fn muted<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().dimmed())
    }

    pub(crate) fn value<T: AsRef<str>>(&self, text: T) -> String {
        self.paint(text.as_ref(), OwoStyle::new().bold())
    }

    fn paint(&self, text: &str, style: OwoStyle) -> String {
        if self.use_colour {
            format!("{}", text.style(style))
        } else {
            text.to_string()
        }
    }
}
