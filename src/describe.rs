use crate::Candidate;

pub fn title(candidate: &Candidate) -> String {
    format!("{} {} Content", candidate.hashtag, candidate.content_type)
}

/// Templated suggestion text. Hashtags are matched exactly, `#` included;
/// anything unknown gets the generic sentence.
pub fn description(candidate: &Candidate) -> String {
    let ct = candidate.content_type.to_lowercase();
    let platform = &candidate.platform;
    let region = &candidate.region;

    match candidate.hashtag.as_str() {
        "#Challenge" => format!(
            "Create engaging {} content featuring popular challenges trending in {}",
            ct, region
        ),
        "#Dance" => format!(
            "Showcase trending dance moves in {} format for {} audience",
            ct, platform
        ),
        "#Education" => format!(
            "Share educational {} content that's currently popular in {}",
            ct, region
        ),
        "#Gaming" => format!(
            "Create gaming-related {} content targeting {} users",
            ct, platform
        ),
        "#Comedy" => format!(
            "Develop humorous {} content that resonates with {} audience",
            ct, region
        ),
        "#Music" => format!("Feature trending music in your {} for maximum engagement", ct),
        "#Tech" => format!("Share technology insights through {} content", ct),
        "#Fashion" => format!("Showcase fashion trends in {} format", ct),
        "#Fitness" => format!(
            "Create fitness-focused {} content for health-conscious audience",
            ct
        ),
        "#Viral" => format!("Tap into viral trends with {} content", ct),
        other => format!("Create {} content around {} trending in {}", ct, other, region),
    }
}
