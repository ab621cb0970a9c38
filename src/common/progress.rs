use indicatif::{ProgressBar, ProgressStyle};

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style.tick_strings(&with_final_frame(&SPINNER_FRAMES)));
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

// indicatif shows the last tick string once the bar is finished
fn with_final_frame<'a>(frames: &[&'a str]) -> Vec<&'a str> {
    let mut all = frames.to_vec();
    all.push(" ");
    all
}
