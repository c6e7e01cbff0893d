use std::collections::HashSet;

/// Prepare raw exposition text for parsing.
///
/// Carriage returns are stripped everywhere, repeated lines are dropped keeping
/// the first occurrence, and the result always ends with a newline.
pub fn normalize(text: &str) -> String {
    let text = text.replace('\r', "");

    let mut seen = HashSet::new();
    let lines: Vec<&str> = text.split('\n').filter(|line| seen.insert(*line)).collect();

    let mut metrics = lines.join("\n");
    if !metrics.ends_with('\n') {
        metrics.push('\n');
    }
    log::debug!(
        "normalized {} input lines into {}",
        text.split('\n').count(),
        lines.len()
    );
    metrics
}
