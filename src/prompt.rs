//! Prompt text sent alongside the user's photo.

use crate::models::TattooParams;

fn placement_lines(params: &TattooParams) -> String {
    let mut lines = String::new();
    if let Some(size) = &params.size {
        lines.push_str(&format!(
            "It should be appropriate for a {} placement on the provided body photo.\n",
            size
        ));
    }
    if let Some(attributes) = &params.physical_attributes {
        lines.push_str(&format!(
            "Take the person's physical attributes into account: {}.\n",
            attributes
        ));
    }
    lines
}

/// Prompt for a first design. `with_reference` adds the instruction for the
/// optional second image.
pub fn generation_prompt(params: &TattooParams, with_reference: bool) -> String {
    let mut prompt = format!(
        "You are a professional tattoo designer.\n\
         Using ONLY the first image provided as the base, design a {} {} tattoo with the theme \"{}\".\n",
        params.color_mode, params.style, params.theme
    );
    prompt.push_str(&placement_lines(params));
    if with_reference {
        prompt.push_str(
            "The second image is a reference: draw inspiration from its artwork, \
             but do not paste it onto the photo.\n",
        );
    }
    prompt.push_str(
        "Keep the original image intact and only overlay the tattoo realistically on the skin.\n\
         Return the edited photo and a short description of the final design.",
    );
    prompt
}

/// Prompt for revising an image the service produced earlier.
pub fn alteration_prompt(params: &TattooParams, feedback: &str) -> String {
    let mut prompt = format!(
        "You are a professional tattoo designer revising a design you already placed on this photo.\n\
         The current design is a {} {} tattoo with the theme \"{}\".\n",
        params.color_mode, params.style, params.theme
    );
    prompt.push_str(&placement_lines(params));
    prompt.push_str(&format!(
        "The client asked for these changes: \"{}\".\n\
         Apply the changes to the tattoo only. Keep the person, pose, lighting and background unchanged.\n\
         Return the revised photo and a one-paragraph summary of what changed.",
        feedback.trim()
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TattooParams {
        TattooParams::new("neo-traditional", "wolf", "full color").with_size("upper arm")
    }

    #[test]
    fn test_generation_prompt_fields() {
        let prompt = generation_prompt(&params(), false);
        assert!(prompt.contains("design a full color neo-traditional tattoo with the theme \"wolf\""));
        assert!(prompt.contains("upper arm placement"));
        assert!(!prompt.contains("second image"));
        assert!(!prompt.contains("physical attributes"));
    }

    #[test]
    fn test_generation_prompt_reference_and_attributes() {
        let params = params().with_physical_attributes("pale skin, freckles");
        let prompt = generation_prompt(&params, true);
        assert!(prompt.contains("second image is a reference"));
        assert!(prompt.contains("pale skin, freckles"));
    }

    #[test]
    fn test_alteration_prompt_contains_feedback() {
        let prompt = alteration_prompt(&params(), "  make the eyes blue \n");
        assert!(prompt.contains("\"make the eyes blue\""));
        assert!(prompt.contains("neo-traditional"));
    }
}
