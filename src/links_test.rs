use super::*;

fn page() -> Url {
    Url::parse("https://blog.example.com/posts/rust/index.html").unwrap()
}

fn click(href: &str) -> LinkClick<'_> {
    LinkClick {
        href,
        modifiers: Modifiers::default(),
        download: false,
        target: "",
    }
}

fn intercepted(decision: ClickDecision) -> String {
    match decision {
        ClickDecision::Intercept(url) => url.to_string(),
        ClickDecision::Passthrough(reason) => panic!("expected intercept, got {reason:?}"),
    }
}

// =============================================================
// is_navigation_candidate
// =============================================================

#[test]
fn candidates_are_relative_or_root_relative() {
    assert!(is_navigation_candidate("/about"));
    assert!(is_navigation_candidate("./next.html"));
    assert!(is_navigation_candidate("../index.html"));
    assert!(!is_navigation_candidate("https://example.com/"));
    assert!(!is_navigation_candidate("#top"));
    assert!(!is_navigation_candidate("about"));
    assert!(!is_navigation_candidate("mailto:me@example.com"));
}

#[test]
fn selector_covers_every_candidate_prefix() {
    for prefix in ["\"/\"", "\"./\"", "\"../\""] {
        assert!(NAVIGATION_LINK_SELECTOR.contains(prefix), "missing {prefix}");
    }
}

// =============================================================
// classify_click
// =============================================================

#[test]
fn root_relative_click_is_intercepted_with_absolute_url() {
    let decision = classify_click(&click("/about"), &page());
    assert_eq!(intercepted(decision), "https://blog.example.com/about");
}

#[test]
fn dot_relative_clicks_resolve_against_page() {
    assert_eq!(
        intercepted(classify_click(&click("./part-2.html"), &page())),
        "https://blog.example.com/posts/rust/part-2.html"
    );
    assert_eq!(
        intercepted(classify_click(&click("../"), &page())),
        "https://blog.example.com/posts/"
    );
}

#[test]
fn query_and_fragment_survive_resolution() {
    assert_eq!(
        intercepted(classify_click(&click("/search?q=wasm#results"), &page())),
        "https://blog.example.com/search?q=wasm#results"
    );
}

#[test]
fn any_modifier_passes_through() {
    let held = [
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        },
        Modifiers {
            meta: true,
            ..Modifiers::default()
        },
        Modifiers {
            shift: true,
            ..Modifiers::default()
        },
    ];
    for modifiers in held {
        let mut link = click("/about");
        link.modifiers = modifiers;
        let decision = classify_click(&link, &page());
        assert_eq!(decision, ClickDecision::Passthrough(PassReason::ModifierKey));
    }
}

#[test]
fn fragment_only_link_passes_through() {
    assert_eq!(
        classify_click(&click("#comments"), &page()),
        ClickDecision::Passthrough(PassReason::InPageAnchor)
    );
}

#[test]
fn download_link_passes_through() {
    let mut link = click("/feed.xml");
    link.download = true;
    let decision = classify_click(&link, &page());
    assert_eq!(decision, ClickDecision::Passthrough(PassReason::Download));
}

#[test]
fn blank_target_passes_through() {
    for target in ["_blank", "_BLANK"] {
        let mut link = click("/about");
        link.target = target;
        let decision = classify_click(&link, &page());
        assert_eq!(decision, ClickDecision::Passthrough(PassReason::NewContext));
    }
}

#[test]
fn self_target_is_intercepted() {
    let mut link = click("/about");
    link.target = "_self";
    let decision = classify_click(&link, &page());
    assert!(matches!(decision, ClickDecision::Intercept(_)));
}

#[test]
fn protocol_relative_link_to_other_host_passes_through() {
    assert_eq!(
        classify_click(&click("//cdn.example.net/asset"), &page()),
        ClickDecision::Passthrough(PassReason::CrossOrigin)
    );
}

#[test]
fn same_origin_requires_matching_port_and_scheme() {
    let a = Url::parse("https://example.com/").unwrap();
    assert!(same_origin(&a, &Url::parse("https://example.com:443/x").unwrap()));
    assert!(!same_origin(&a, &Url::parse("https://example.com:8443/").unwrap()));
    assert!(!same_origin(&a, &Url::parse("http://example.com/").unwrap()));
}
