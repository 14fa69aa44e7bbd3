use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Human-readable command reports on stdout.
pub struct Output<W: WriteColor = StandardStream> {
    stdout: W,
}

impl Output {
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(color_choice),
        }
    }
}

impl<W: WriteColor> Output<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { stdout: writer }
    }

    pub fn into_inner(self) -> W {
        self.stdout
    }

    fn set_color(&mut self, color: Color) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    }

    fn set_bold(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_bold(true));
    }

    fn set_dim(&mut self) {
        let _ = self.stdout.set_color(ColorSpec::new().set_dimmed(true));
    }

    fn reset(&mut self) {
        let _ = self.stdout.reset();
    }

    pub fn heading(&mut self, text: &str) {
        self.set_bold();
        let _ = writeln!(self.stdout, "{}", text);
        self.reset();
    }

    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{}", text);
    }

    /// An indented, dimmed detail line.
    pub fn item(&mut self, text: &str) {
        self.set_dim();
        let _ = writeln!(self.stdout, "    {}", text);
        self.reset();
    }

    pub fn success(&mut self, text: &str) {
        self.set_color(Color::Green);
        let _ = write!(self.stdout, "✓");
        self.reset();
        let _ = writeln!(self.stdout, " {}", text);
    }

    pub fn warning(&mut self, text: &str) {
        self.set_color(Color::Yellow);
        let _ = write!(self.stdout, "⚠");
        self.reset();
        let _ = writeln!(self.stdout, " {}", text);
    }

    pub fn failure(&mut self, text: &str) {
        self.set_color(Color::Red);
        let _ = write!(self.stdout, "✗");
        self.reset();
        let _ = writeln!(self.stdout, " {}", text);
    }

    pub fn json(&mut self, value: &serde_json::Value) {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        self.set_dim();
        let _ = writeln!(self.stdout, "{}", text);
        self.reset();
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

#[cfg(test)]
pub(crate) fn buffered() -> Output<termcolor::Buffer> {
    Output::with_writer(termcolor::Buffer::no_color())
}

#[cfg(test)]
pub(crate) fn contents(output: Output<termcolor::Buffer>) -> String {
    String::from_utf8(output.into_inner().into_inner()).unwrap()
}
