const FILLED: char = '#';
const EMPTY: char = '-';

pub struct ProgressBar {
    pub ratio: f64,
    pub width: usize,
}

impl ProgressBar {
    pub fn new(ratio: f64, width: usize) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            width,
        }
    }

    pub fn render(&self) -> String {
        let filled = (self.ratio * self.width as f64) as usize;
        let mut bar = String::with_capacity(self.width + 8);
        bar.push('[');
        bar.extend(std::iter::repeat_n(FILLED, filled));
        bar.extend(std::iter::repeat_n(EMPTY, self.width - filled));
        bar.push_str(&format!("] {:>3.0}%", self.ratio * 100.0));
        bar
    }
}
