use pollytalk_core::Notice;
use std::io::IsTerminal;

#[derive(Clone)]
pub struct Formatter {
    use_colors: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Colors only when stderr is a terminal
    pub fn detect() -> Self {
        Self {
            use_colors: std::io::stderr().is_terminal(),
        }
    }

    pub fn print_system(&self, msg: &str) {
        if self.use_colors {
            println!("\x1b[33m[System]\x1b[0m {msg}");
        } else {
            println!("[System] {msg}");
        }
    }

    pub fn print_warning(&self, msg: &str) {
        if self.use_colors {
            eprintln!("\x1b[33m[Warning]\x1b[0m {msg}");
        } else {
            eprintln!("[Warning] {msg}");
        }
    }

    pub fn print_notice(&self, notice: &Notice) {
        let title = notice.title_text();
        let description = notice.description_text();
        if self.use_colors && notice.destructive {
            eprintln!("\x1b[31m[{title}]\x1b[0m {description}");
        } else {
            eprintln!("[{title}] {description}");
        }
    }
}
