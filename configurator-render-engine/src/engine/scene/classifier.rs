use constants::component::{COMPONENT_PATTERNS, ShoeComponent};

/// Classify a raw mesh name into exactly one shoe component.
///
/// The name is lower-cased and trimmed, then tested against the ordered
/// pattern table; the first category with a matching substring wins, so
/// overlapping patterns resolve by table order. Names matching nothing
/// (including empty/whitespace names) classify as `Unknown`.
pub fn classify_mesh_name(mesh_name: &str) -> ShoeComponent {
    let lowered = mesh_name.to_lowercase();
    let lowered = lowered.trim();

    if lowered.is_empty() {
        return ShoeComponent::Unknown;
    }

    for (component, patterns) in COMPONENT_PATTERNS {
        for pattern in *patterns {
            if lowered.contains(pattern) {
                return *component;
            }
        }
    }

    ShoeComponent::Unknown
}
