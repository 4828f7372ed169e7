// @module: Video-safe line wrapping for scene text

/// Marker appended when a line must be truncated to fit
const ELLIPSIS: &str = "...";

/// Reflows scene text into at most two lines of bounded length.
#[derive(Debug, Clone, Copy)]
pub struct LineWrapper {
    /// Target maximum characters per line
    max_line_length: usize,

    /// Maximum number of output lines
    max_lines: usize,
}

impl Default for LineWrapper {
    fn default() -> Self {
        Self {
            max_line_length: 35,
            max_lines: 2,
        }
    }
}

impl LineWrapper {
    pub fn new(max_line_length: usize, max_lines: usize) -> Self {
        Self {
            max_line_length,
            max_lines: max_lines.max(1),
        }
    }

    /// Wrap text into at most `max_lines` newline-joined lines.
    ///
    /// Greedy word wrap first; if that produces too many lines, salvage any
    /// exactly-`max_lines` qualifying lines from the greedy result, else
    /// forcibly compress with ellipsis truncation. A single word longer than
    /// the limit is kept whole on its own line and allowed to exceed the
    /// limit - a mid-word split reads worse than an overlong line.
    pub fn wrap(&self, text: &str) -> String {
        let greedy = self.greedy_wrap(text);

        if greedy.len() <= self.max_lines {
            return greedy.join("\n");
        }

        // Salvage: keep the lines that individually fit, if exactly the
        // right number of them qualify
        let fitting: Vec<&String> = greedy
            .iter()
            .filter(|line| line.chars().count() <= self.max_line_length)
            .collect();
        if fitting.len() == self.max_lines {
            return fitting
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
        }

        self.compress(&greedy)
    }

    /// Greedy word wrap: append whole words while the running line fits
    fn greedy_wrap(&self, text: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                // A word longer than the limit stays whole on its own line
                current.push_str(word);
                continue;
            }

            let candidate_len = current.chars().count() + 1 + word.chars().count();
            if candidate_len <= self.max_line_length {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }

        lines
    }

    /// Forcibly compress an overlong greedy result into `max_lines` lines:
    /// the leading lines come straight from the greedy pass, the last line
    /// absorbs the remainder, and anything over budget is ellipsis-truncated.
    fn compress(&self, greedy: &[String]) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.max_lines);

        for line in greedy.iter().take(self.max_lines - 1) {
            lines.push(self.truncate_line(line));
        }

        let remainder = greedy[self.max_lines - 1..].join(" ");
        lines.push(self.truncate_line(&remainder));

        lines.join("\n")
    }

    /// Truncate a line to the length limit with a trailing ellipsis
    fn truncate_line(&self, line: &str) -> String {
        if line.chars().count() <= self.max_line_length {
            return line.to_string();
        }

        let keep = self.max_line_length.saturating_sub(ELLIPSIS.len());
        let mut truncated: String = line.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    }
}
