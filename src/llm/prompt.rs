use crate::preferences::dto::Preferences;

/// User message followed by whichever preferences are set.
pub fn build_meal_prompt(message: &str, prefs: Option<&Preferences>) -> String {
    let mut prompt = message.to_string();
    if let Some(prefs) = prefs {
        if !prefs.dietary_restrictions.trim().is_empty() {
            prompt.push_str(&format!(
                "\nDietary restrictions: {}",
                prefs.dietary_restrictions.trim()
            ));
        }
        if prefs.max_cooking_time > 0 {
            prompt.push_str(&format!(
                "\nMaximum cooking time: {} minutes",
                prefs.max_cooking_time
            ));
        }
    }
    prompt
}
