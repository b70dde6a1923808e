//! Trigger expression rewriting for template trigger synthesis.

/// Priority used when the source trigger does not report one ("Average").
pub const DEFAULT_PRIORITY: &str = "3";

/// Replace `:<from>:` item references with `:<to>:` for every pair.
pub fn substitute_item_ids(expression: &str, replacements: &[(String, String)]) -> String {
    let mut rewritten = expression.to_string();
    for (from, to) in replacements {
        if from == to {
            continue;
        }
        rewritten = rewritten.replace(&format!(":{from}:"), &format!(":{to}:"));
    }
    rewritten
}

/// Description given to a template trigger synthesised from a host trigger.
pub fn template_trigger_description(description: &str) -> String {
    format!("Template: {description}")
}

/// Comments recording where a synthesised template trigger came from.
pub fn template_trigger_comments(host_triggerid: &str, comments: Option<&str>) -> String {
    format!(
        "Auto-created template trigger for dependencies. Based on host trigger {host_triggerid}. {}",
        comments.unwrap_or_default()
    )
}
