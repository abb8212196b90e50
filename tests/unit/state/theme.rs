use super::*;

#[test]
fn builtin_themes_are_cosmic_tough_party() {
    let themes = builtin_themes();
    let ids: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["cosmic", "tough", "party"]);
}

#[test]
fn party_restricts_speech_pool() {
    let themes = builtin_themes();
    let party = themes.iter().find(|t| t.id == "party").unwrap();
    assert_eq!(
        party.rules.get("speech").unwrap(),
        &vec!["GM".to_string(), "WAGMI".to_string(), "Meow".to_string()]
    );
}

#[test]
fn unruled_categories_are_absent_from_the_table() {
    let themes = builtin_themes();
    let cosmic = themes.iter().find(|t| t.id == "cosmic").unwrap();
    assert!(cosmic.rules.get("hat").is_none());
    assert!(cosmic.rules.get("costume").is_none());
}
