use siteprov_core::console::ScriptedConsole;
use siteprov_core::provision::{SiteResolutionError, SiteResolver};
use siteprov_core::types::SiteSelection;

fn resolve(
    answers: &[&str],
    sites: &[u32],
) -> (Result<SiteSelection, SiteResolutionError>, ScriptedConsole) {
    let mut console = ScriptedConsole::new(answers.iter().copied());
    let result = SiteResolver::default().resolve(&mut console, sites);
    (result, console)
}

#[test]
fn empty_input_selects_default_site() {
    let (result, console) = resolve(&[""], &[1, 2]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 1 });
    assert!(console.printed("No number entered, will continue with Default Site with id 1."));
    assert_eq!(console.prompts().len(), 1);
}

#[test]
fn zero_is_rejected_and_reprompted() {
    let (result, console) = resolve(&["0", "2"], &[1, 2]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 2 });
    assert!(console.printed("Site is no number, try again"));
    assert_eq!(console.prompts().len(), 2);
}

#[test]
fn non_numeric_input_is_reprompted() {
    let (result, console) = resolve(&["abc", "1"], &[1]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 1 });
    assert!(console.printed("Site is no number, try again"));
}

#[test]
fn negative_id_is_reported_as_unknown_site() {
    let (result, console) = resolve(&["-2", "1"], &[1]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 1 });
    assert!(console.printed("Site with id -2 not found, try again"));
    assert!(!console.printed("Site is no number"));
}

#[test]
fn unknown_site_is_reprompted_and_retry_value_returned() {
    let (result, console) = resolve(&["3", "2"], &[1, 2]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 2 });
    assert!(console.printed("Site with id 3 not found, try again"));
}

#[test]
fn existing_site_resolves_directly() {
    let (result, console) = resolve(&["3"], &[1, 3]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 3 });
    assert!(!console.printed("try again"));
}

#[test]
fn default_site_missing_keeps_asking() {
    let (result, console) = resolve(&["", "x", "", "5"], &[5]);

    assert_eq!(result.unwrap(), SiteSelection { site_id: 5 });
    assert_eq!(console.prompts().len(), 4);
}

#[test]
fn bounded_resolver_gives_up() {
    let mut console = ScriptedConsole::new(["abc", "9", "1"]);

    let err = SiteResolver::new(1, 2)
        .resolve(&mut console, &[1])
        .unwrap_err();

    assert!(matches!(err, SiteResolutionError::AttemptsExhausted { attempts: 2 }));
    assert_eq!(console.remaining_answers(), 1);
}

#[test]
fn closed_input_ends_resolution() {
    let (result, _) = resolve(&["7"], &[1]);

    assert!(matches!(result, Err(SiteResolutionError::Console(_))));
}

#[test]
fn configured_default_id_is_used() {
    let mut console = ScriptedConsole::new([""]);

    let site = SiteResolver::new(3, 0).resolve(&mut console, &[3]).unwrap();

    assert_eq!(site.site_id, 3);
    assert!(console.printed("Default Site with id 3"));
}
