//! Integration tests for the rule store, codec and conflict detector

use std::collections::HashMap;
use tbr_core::template;
use tbr_core::validator;
use tbr_core::{Codec, ConflictDetector, Format, Rule, RuleKind, RuleStore, StoreConfig};

fn temp_store() -> (tempfile::TempDir, RuleStore) {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = RuleStore::open(StoreConfig::in_dir(temp_dir.path())).unwrap();
    (temp_dir, store)
}

fn multiset(rules: Vec<Rule>) -> HashMap<Rule, usize> {
    let mut counts = HashMap::new();
    for rule in rules {
        *counts.entry(rule).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_add_then_remove_host() {
    let (_dir, store) = temp_store();

    store.add_rule("api.test.com", RuleKind::Host, true).unwrap();
    assert_eq!(
        store.list_rules().unwrap(),
        vec![Rule::new("api.test.com", RuleKind::Host, true)]
    );

    store.remove_rule("api.test.com").unwrap();
    assert!(store.list_rules().unwrap().is_empty());
}

#[test]
fn test_remove_missing_pattern_is_ok() {
    let (_dir, store) = temp_store();
    store.add_rule("keep.com", RuleKind::Host, true).unwrap();

    assert!(store.remove_rule("absent.com").is_ok());
    assert_eq!(store.list_rules().unwrap().len(), 1);
}

#[test]
fn test_toggle_twice_restores_state() {
    let (_dir, store) = temp_store();
    store.add_rule(r".*\.corp", RuleKind::Regex, true).unwrap();
    store.add_rule("off.com", RuleKind::Host, false).unwrap();

    let before = store.list_rules().unwrap();

    assert!(!store.toggle_rule(r".*\.corp").unwrap());
    assert!(store.toggle_rule(r".*\.corp").unwrap());
    assert!(store.toggle_rule("off.com").unwrap());
    assert!(!store.toggle_rule("off.com").unwrap());

    assert_eq!(store.list_rules().unwrap(), before);
}

#[test]
fn test_json_round_trip_into_fresh_store() {
    let (_dir, source) = temp_store();
    source.add_rule("foo.com", RuleKind::Host, true).unwrap();
    source.add_rule("bar.com", RuleKind::Host, false).unwrap();
    source.add_rule(r".*\.baz\.com", RuleKind::Regex, true).unwrap();
    source.add_rule(r"^dev-", RuleKind::Regex, false).unwrap();

    let exported = Codec::new(&source).export(Format::Json).unwrap();

    let (_dir2, target) = temp_store();
    let summary = Codec::new(&target).import(Format::Json, &exported).unwrap();
    assert_eq!(summary.imported, 4);

    assert_eq!(
        multiset(target.list_rules().unwrap()),
        multiset(source.list_rules().unwrap())
    );
}

#[test]
fn test_yaml_round_trip_into_fresh_store() {
    let (_dir, source) = temp_store();
    source.add_rule("foo.com", RuleKind::Host, true).unwrap();
    source.add_rule(r"^dev-", RuleKind::Regex, false).unwrap();

    let exported = Codec::new(&source).export(Format::Yaml).unwrap();
    assert!(exported.contains("for_authorized_testing_only: true"));

    let (_dir2, target) = temp_store();
    Codec::new(&target).import(Format::Yaml, &exported).unwrap();
    assert_eq!(target.list_rules().unwrap(), source.list_rules().unwrap());
}

#[test]
fn test_txt_import_scenario() {
    let (_dir, store) = temp_store();
    let content = "[BLOCK_HOSTS]\nfoo.com\n#DISABLED bar.com\n[BLOCK_RULES]\n.*\\.baz\\.com\n";

    let summary = Codec::new(&store).import(Format::Txt, content).unwrap();
    assert_eq!(summary.imported, 3);
    assert_eq!(
        store.list_rules().unwrap(),
        vec![
            Rule::new("foo.com", RuleKind::Host, true),
            Rule::new("bar.com", RuleKind::Host, false),
            Rule::new(r".*\.baz\.com", RuleKind::Regex, true),
        ]
    );
}

#[test]
fn test_txt_export_reimports_identically() {
    let (_dir, source) = temp_store();
    source.add_rule("foo.com", RuleKind::Host, true).unwrap();
    source.add_rule("bar.com", RuleKind::Host, false).unwrap();
    source.add_rule(r"^x", RuleKind::Regex, true).unwrap();

    let exported = Codec::new(&source).export(Format::Txt).unwrap();

    let (_dir2, target) = temp_store();
    Codec::new(&target).import(Format::Txt, &exported).unwrap();
    assert_eq!(target.list_rules().unwrap(), source.list_rules().unwrap());
}

#[test]
fn test_import_is_additive() {
    let (_dir, store) = temp_store();
    store.add_rule("foo.com", RuleKind::Host, true).unwrap();

    Codec::new(&store)
        .import(Format::Txt, "[BLOCK_HOSTS]\nfoo.com\n")
        .unwrap();

    let rules = store.list_rules().unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().all(|r| r.pattern == "foo.com"));
}

#[test]
fn test_backup_retention_after_twelve_mutations() {
    let (_dir, store) = temp_store();

    store.add_rule("host0.com", RuleKind::Host, true).unwrap();
    let first = store.backups().unwrap();
    assert_eq!(first.len(), 1);

    store.add_rule("host1.com", RuleKind::Host, true).unwrap();
    let second: Vec<_> = store
        .backups()
        .unwrap()
        .into_iter()
        .filter(|p| !first.contains(p))
        .collect();
    assert_eq!(second.len(), 1);

    for i in 2..12 {
        match i % 3 {
            0 => store.add_rule(&format!("host{i}.com"), RuleKind::Host, true).unwrap(),
            1 => {
                store.toggle_rule("host0.com").unwrap();
            }
            _ => store.remove_rule("absent.com").unwrap(),
        }
    }

    let remaining = store.backups().unwrap();
    assert_eq!(remaining.len(), 10);
    assert!(!remaining.contains(&first[0]));
    assert!(!remaining.contains(&second[0]));
}

#[test]
fn test_backup_is_previous_state() {
    let (_dir, store) = temp_store();
    let before = std::fs::read_to_string(store.path()).unwrap();

    store.add_rule("foo.com", RuleKind::Host, true).unwrap();

    let backups = store.backups().unwrap();
    let backup = std::fs::read_to_string(&backups[0]).unwrap();
    assert_eq!(backup, before);

    let name = backups[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("tls_bypass_rule_backup_"));
    assert!(name.ends_with(".txt"));
}

#[test]
fn test_conflicts_from_store() {
    let (_dir, store) = temp_store();
    store.add_rule(r".*\.example\.com", RuleKind::Regex, true).unwrap();
    store.add_rule("www.example.com", RuleKind::Host, true).unwrap();

    let conflicts = ConflictDetector::default().find_conflicts(&store.list_rules().unwrap());
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].sample, "www.example.com");
    assert_eq!(conflicts[0].kind.as_str(), "potential_overlap");
}

#[test]
fn test_template_feeds_store() {
    let (_dir, store) = temp_store();
    let pattern = template::generate("Match all subdomains", "example.com");
    assert_eq!(pattern, r".*\.example\.com");

    store.add_rule(&pattern, RuleKind::Regex, true).unwrap();
    assert!(validator::test(&pattern, "api.example.com"));
    assert_eq!(store.stats().unwrap().regex_count, 1);
}

#[test]
fn test_validator_contract() {
    let (valid, message) = validator::validate("[invalid").into_parts();
    assert!(!valid);
    assert!(!message.is_empty());

    let (valid, message) = validator::validate(".*\\.example\\.com").into_parts();
    assert!(valid);
    assert!(message.is_empty());
}

#[test]
fn test_hand_edited_file_is_respected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("tls_bypass_rule.txt");
    std::fs::write(
        &path,
        "# custom header\n#legacy\n\n[BLOCK_HOSTS]\none.com\n#two.com\n\n[BLOCK_RULES]\n^three\n",
    )
    .unwrap();

    let store = RuleStore::initialize(&path).unwrap();
    assert_eq!(
        store.list_rules().unwrap(),
        vec![
            Rule::new("legacy", RuleKind::Host, false),
            Rule::new("one.com", RuleKind::Host, true),
            Rule::new("two.com", RuleKind::Host, false),
            Rule::new("^three", RuleKind::Regex, true),
        ]
    );

    let sync = std::fs::read_to_string(store.sync_path()).unwrap();
    assert!(sync.contains("\none.com\n^three\n"));
}
