use market_console_gate::navigation::{
    NavigationError, Page, PathPattern, PatternError, RedirectDirective, RouteEntry, RouteTable,
    RouteTarget, Segment, TableError, Visibility,
};

fn console() -> RouteTable {
    RouteTable::console().expect("console table must build")
}

// --- Pattern parsing ---

#[test]
fn test_pattern_parses_static_and_param_segments() {
    let pattern = PathPattern::parse("/leads/:id").unwrap();

    assert_eq!(
        pattern.segments(),
        &[
            Segment::Static("leads".to_string()),
            Segment::Param("id".to_string())
        ]
    );
    assert_eq!(pattern.as_str(), "/leads/:id");
    assert_eq!(pattern.to_axum_path(), "/leads/{id}");
}

#[test]
fn test_root_pattern_has_no_segments() {
    let root = PathPattern::parse("/").unwrap();

    assert!(root.segments().is_empty());
    assert_eq!(root.to_axum_path(), "/");
}

#[test]
fn test_pattern_trailing_slash_is_normalized() {
    let pattern = PathPattern::parse("/buyers/").unwrap();
    assert_eq!(pattern.as_str(), "/buyers");
}

#[test]
fn test_pattern_rejects_malformed_literals() {
    assert!(matches!(
        PathPattern::parse("leads"),
        Err(PatternError::MissingLeadingSlash(_))
    ));
    assert!(matches!(
        PathPattern::parse("/leads//notes"),
        Err(PatternError::EmptySegment(_))
    ));
    assert!(matches!(
        PathPattern::parse("//"),
        Err(PatternError::EmptySegment(_))
    ));
    assert!(matches!(
        PathPattern::parse("/leads/:"),
        Err(PatternError::UnnamedParam(_))
    ));
    assert_eq!(
        PathPattern::parse("/a/:id/b/:id"),
        Err(PatternError::DuplicateParam {
            pattern: "/a/:id/b/:id".to_string(),
            name: "id".to_string(),
        })
    );
}

// --- Table construction ---

#[test]
fn test_console_table_partitions() {
    let table = console();

    let public: Vec<&str> = table.public().map(|e| e.pattern.as_str()).collect();
    assert_eq!(public, vec!["/login", "/register"]);

    let protected: Vec<&str> = table.protected().map(|e| e.pattern.as_str()).collect();
    assert_eq!(
        protected,
        vec![
            "/",
            "/inbox",
            "/dashboard",
            "/leads",
            "/leads/:id",
            "/parcels",
            "/outreach",
            "/buyers",
            "/buyers/:id",
            "/comps",
            "/ingestion",
            "/settings",
        ]
    );
}

#[test]
fn test_console_root_forwards_to_dashboard() {
    let table = console();
    let root = table.resolve("/").unwrap();

    assert_eq!(root.entry.visibility, Visibility::Protected);
    assert_eq!(
        root.entry.target,
        RouteTarget::Redirect(RedirectDirective::replace("/dashboard"))
    );
}

#[test]
fn test_ambiguous_table_is_rejected() {
    let result = RouteTable::new(vec![
        RouteEntry::page("/leads/:id", Page::LeadDetail, Visibility::Protected).unwrap(),
        RouteEntry::page("/leads/:lead", Page::Leads, Visibility::Protected).unwrap(),
    ]);

    assert_eq!(
        result.unwrap_err(),
        TableError::Ambiguous {
            first: "/leads/:id".to_string(),
            second: "/leads/:lead".to_string(),
        }
    );
}

#[test]
fn test_duplicate_static_route_is_rejected() {
    let result = RouteTable::new(vec![
        RouteEntry::page("/inbox", Page::Inbox, Visibility::Protected).unwrap(),
        RouteEntry::page("/inbox/", Page::Inbox, Visibility::Public).unwrap(),
    ]);

    assert!(matches!(result, Err(TableError::Ambiguous { .. })));
}

// --- Resolution ---

#[test]
fn test_resolve_binds_path_params() {
    let table = console();

    let lead = table.resolve("/leads/42").unwrap();
    assert_eq!(lead.entry.target, RouteTarget::Page(Page::LeadDetail));
    assert_eq!(lead.params.get("id").map(String::as_str), Some("42"));

    let buyer = table.resolve("/buyers/abc-7").unwrap();
    assert_eq!(buyer.entry.target, RouteTarget::Page(Page::BuyerDetail));
    assert_eq!(buyer.params.get("id").map(String::as_str), Some("abc-7"));
}

#[test]
fn test_resolve_static_pages_have_no_params() {
    let table = console();
    let leads = table.resolve("/leads").unwrap();

    assert_eq!(leads.entry.target, RouteTarget::Page(Page::Leads));
    assert!(leads.params.is_empty());
}

#[test]
fn test_resolve_ignores_query_fragment_and_trailing_slash() {
    let table = console();

    let with_query = table.resolve("/leads/42?tab=notes#top").unwrap();
    assert_eq!(with_query.params.get("id").map(String::as_str), Some("42"));

    let trailing = table.resolve("/settings/").unwrap();
    assert_eq!(trailing.entry.target, RouteTarget::Page(Page::Settings));
}

#[test]
fn test_static_segment_wins_over_param() {
    let table = RouteTable::new(vec![
        RouteEntry::page("/leads/:id", Page::LeadDetail, Visibility::Protected).unwrap(),
        RouteEntry::page("/leads/new", Page::Leads, Visibility::Protected).unwrap(),
    ])
    .unwrap();

    let new = table.resolve("/leads/new").unwrap();
    assert_eq!(new.entry.target, RouteTarget::Page(Page::Leads));
    assert!(new.params.is_empty());

    let other = table.resolve("/leads/17").unwrap();
    assert_eq!(other.entry.target, RouteTarget::Page(Page::LeadDetail));
}

#[test]
fn test_resolve_not_found() {
    let table = console();

    for path in ["/reports", "/leads/42/notes", "leads", ""] {
        assert_eq!(
            table.resolve(path).unwrap_err(),
            NavigationError::NotFound {
                path: path.to_string()
            },
            "{path} should not resolve"
        );
    }
}

#[test]
fn test_static_segments_are_case_sensitive() {
    let table = console();

    assert!(table.resolve("/dashboard").is_ok());
    assert_eq!(
        table.resolve("/Dashboard").unwrap_err(),
        NavigationError::NotFound {
            path: "/Dashboard".to_string()
        }
    );
}
