/// Characters counted as one word, the usual typing-test convention.
pub const CHARS_PER_WORD: f64 = 5.0;

pub fn compute_wpm(chars_typed: usize, seconds_elapsed: f64) -> f64 {
    if seconds_elapsed <= 0.0 {
        return 0.0;
    }

    let words = chars_typed as f64 / CHARS_PER_WORD;
    let minutes = seconds_elapsed / 60.0;

    words / minutes
}

/// Percentage of `total_chars` that were correct. Not clamped: callers keep
/// `correct_chars <= total_chars`.
pub fn compute_accuracy(correct_chars: usize, total_chars: usize) -> f64 {
    match total_chars {
        0 => 0.0,
        total => (correct_chars as f64 / total as f64) * 100.0,
    }
}

/// Composite ranking metric: speed weighted by accuracy, rounded down.
pub fn compute_score(wpm: f64, accuracy_percent: f64) -> u32 {
    let score = (wpm * (accuracy_percent / 100.0)).floor();
    if score.is_finite() && score > 0.0 {
        score as u32
    } else {
        0
    }
}
