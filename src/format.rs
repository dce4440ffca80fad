//! Small display formatters shared by the REPL and commands.

use std::time::Duration;

/// Per-turn cost: `$0.000123`, or `N/A` when the model has no price.
pub fn format_turn_cost(cost: Option<f64>) -> String {
    match cost {
        Some(c) => format!("${c:.6}"),
        None => "N/A".to_string(),
    }
}

/// Footer printed after a successful turn.
pub fn format_turn_footer(elapsed: Duration, cost: Option<f64>) -> String {
    format!(
        "Time: {:.2}s | Cost: {}",
        elapsed.as_secs_f64(),
        format_turn_cost(cost)
    )
}

/// Status line shown above the input prompt.
pub fn format_status_line(prompt_name: &str, model: &str, session_cost: f64) -> String {
    format!("Prompt: {prompt_name} | Model: {model} | Cost: ${session_cost:.4}")
}

/// Pads `name` to `width` columns for two-column listings.
pub fn pad(name: &str, width: usize) -> String {
    format!("{name:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_cost_is_not_zero() {
        assert_eq!(format_turn_cost(None), "N/A");
        assert_eq!(format_turn_cost(Some(0.0)), "$0.000000");
        assert_eq!(format_turn_cost(Some(0.014)), "$0.014000");
    }

    #[test]
    fn test_footer_and_status() {
        assert_eq!(
            format_turn_footer(Duration::from_millis(1234), None),
            "Time: 1.23s | Cost: N/A"
        );
        assert_eq!(
            format_status_line("default", "openai/gpt-x", 0.5),
            "Prompt: default | Model: openai/gpt-x | Cost: $0.5000"
        );
        assert_eq!(pad("/help", 8), "/help   ");
    }
}
