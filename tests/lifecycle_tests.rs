//! Library-level tests covering the install, remove, and update lifecycle
//! against a registry on disk.


use forge::{
    get_registry_items, install_bundle, install_item, list_items, load_project, remove_item,
    update_all, update_item, Error, ItemIndex, ItemKind, ProjectConfig, ProjectType,
    RegistrySource, UpdateOutcome,
};
use test_utils::{assertions, MockItem, TestProject, TestRegistry};

mod catalog {
    use super::*;

    #[test]
    fn test_catalog_contains_every_well_formed_item() {
        let registry = TestRegistry::new();
        registry
            .add(&MockItem::agent("reviewer"))
            .add(&MockItem::rule("style"))
            .add(&MockItem::skill("testing"))
            .add(&MockItem::bundle("starter").with_member("rule", "style"));

        let items = get_registry_items(registry.path()).unwrap();
        assert_eq!(items.len(), 4);

        let mut keys: Vec<(ItemKind, String, String)> = items
            .iter()
            .map(|i| (i.kind, i.id.clone(), i.path.clone()))
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                (ItemKind::Agent, "reviewer".into(), "agents/reviewer".into()),
                (ItemKind::Rule, "style".into(), "rules/style".into()),
                (ItemKind::Skill, "testing".into(), "skills/testing".into()),
                (ItemKind::Bundle, "starter".into(), "bundles/starter".into()),
            ]
        );
    }

    #[test]
    fn test_malformed_manifests_are_omitted() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::rule("good"));
        registry.add_raw("rules", "no-types", "version: 1.0.0\n");
        registry.add_raw("agents", "no-version", "project_types: [backend]\n");
        registry.add_raw(
            "bundles",
            "only-bundles",
            "version: 1.0.0\nproject_types: [backend]\nitems:\n  - kind: bundle\n    id: other\n",
        );
        registry.add_raw("skills", "list", "- not\n- a mapping\n");

        let items = get_registry_items(registry.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "good");
    }
}

mod install {
    use super::*;

    #[test]
    fn test_agent_always_lands_at_id_md() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::agent("a").with_payload("Backend Engineer.md", "agent body"));
        let project = TestProject::initialized(&["backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let index = ItemIndex::new(&items);
        let (root, mut config) = load_project(project.path()).unwrap();

        let agent = index.require(ItemKind::Agent, "a").unwrap();
        install_item(registry.path(), agent, &root, &mut config, "main").unwrap();

        assertions::file_contains(&project.cursor_path("agents/a.md"), "agent body");
        assert_eq!(config.installed.len(), 1);
        assert_eq!(config.installed[0].kind, ItemKind::Agent);
        assert_eq!(config.installed[0].id, "a");
    }

    #[test]
    fn test_bundle_installs_all_members() {
        let registry = TestRegistry::new();
        registry
            .add(&MockItem::rule("r"))
            .add(&MockItem::skill("s"))
            .add(
                &MockItem::bundle("b")
                    .with_member("rule", "r")
                    .with_member("skill", "s"),
            );
        let project = TestProject::initialized(&["backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let index = ItemIndex::new(&items);
        let (root, mut config) = load_project(project.path()).unwrap();
        let bundle = index.require(ItemKind::Bundle, "b").unwrap();

        let records =
            install_bundle(registry.path(), bundle, &index, &root, &mut config, "main").unwrap();
        assert_eq!(records.len(), 2);

        assertions::file_exists(&project.cursor_path("rules/r/RULE.md"));
        assertions::file_exists(&project.cursor_path("skills/s/SKILL.md"));

        let saved = ProjectConfig::load(&root).unwrap().unwrap();
        assert_eq!(saved.installed.len(), 2);
    }

    #[test]
    fn test_bundle_with_missing_member_installs_nothing() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::rule("r")).add(
            &MockItem::bundle("b")
                .with_member("rule", "r")
                .with_member("skill", "s"),
        );
        let project = TestProject::initialized(&["backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let index = ItemIndex::new(&items);
        let (root, mut config) = load_project(project.path()).unwrap();
        let bundle = index.require(ItemKind::Bundle, "b").unwrap();

        let err = install_bundle(registry.path(), bundle, &index, &root, &mut config, "main")
            .unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { kind: ItemKind::Skill, .. }));

        assert!(config.installed.is_empty());
        assertions::not_exists(&project.cursor_path("rules/r"));
        let saved = ProjectConfig::load(&root).unwrap().unwrap();
        assert!(saved.installed.is_empty());
    }

    #[test]
    fn test_bundle_with_payloadless_member_installs_nothing() {
        let registry = TestRegistry::new();
        registry
            .add(&MockItem::rule("r"))
            .add(&MockItem::skill("s").without_payload())
            .add(
                &MockItem::bundle("b")
                    .with_member("rule", "r")
                    .with_member("skill", "s"),
            );
        let project = TestProject::initialized(&["backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let index = ItemIndex::new(&items);
        let (root, mut config) = load_project(project.path()).unwrap();
        let bundle = index.require(ItemKind::Bundle, "b").unwrap();

        let err = install_bundle(registry.path(), bundle, &index, &root, &mut config, "main")
            .unwrap_err();
        assert!(matches!(err, Error::PayloadMissing { .. }));
        assertions::not_exists(&project.cursor_path("rules/r"));
    }

    #[test]
    fn test_workflow_is_not_installable() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::workflow("release"));
        let project = TestProject::initialized(&["backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let index = ItemIndex::new(&items);
        let (root, mut config) = load_project(project.path()).unwrap();
        let workflow = index.require(ItemKind::Workflow, "release").unwrap();

        assert!(matches!(
            install_item(registry.path(), workflow, &root, &mut config, "main"),
            Err(Error::NotInstallable(ItemKind::Workflow))
        ));
    }
}

mod lifecycle {
    use super::*;

    #[test]
    fn test_list_install_remove_round_trip() {
        let registry = TestRegistry::new();
        registry
            .add(&MockItem::rule("test-rule").with_version("1.0.0"))
            .add(&MockItem::skill("test-skill").with_project_types(&["backend", "frontend"]));
        let project = TestProject::initialized(&["backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let (root, mut config) = load_project(project.path()).unwrap();

        let listed = list_items(&items, Some(&config.project_types), None);
        assert_eq!(listed.len(), 2);

        let index = ItemIndex::new(&items);
        let rule = index.require(ItemKind::Rule, "test-rule").unwrap();
        install_item(registry.path(), rule, &root, &mut config, "main").unwrap();

        assertions::file_exists(&project.cursor_path("rules/test-rule/RULE.md"));
        assert_eq!(config.installed.len(), 1);

        assert!(remove_item(&root, &mut config, ItemKind::Rule, "test-rule").unwrap());
        assertions::not_exists(&project.cursor_path("rules/test-rule"));

        let saved = ProjectConfig::load(&root).unwrap().unwrap();
        assert!(saved.installed.is_empty());
    }

    #[test]
    fn test_remove_absent_item_changes_nothing() {
        let project = TestProject::initialized(&["backend"]);
        let before = project.read_config();

        let (root, mut config) = load_project(project.path()).unwrap();
        assert!(!remove_item(&root, &mut config, ItemKind::Skill, "ghost").unwrap());

        assert_eq!(project.read_config(), before);
        assertions::not_exists(&project.cursor_path(""));
    }

    #[test]
    fn test_legacy_project_type_is_migrated() {
        let project = TestProject::new();
        project.write_config(
            "project_type: data\nregistry:\n  url: https://example.com/r.git\n  ref: main\n",
        );

        let (_root, config) = load_project(project.path()).unwrap();
        assert_eq!(config.project_types, vec![ProjectType::Data]);
    }

    #[test]
    fn test_config_round_trip() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::agent("a"));
        let project = TestProject::initialized(&["frontend", "backend"]);

        let items = get_registry_items(registry.path()).unwrap();
        let (root, mut config) = load_project(project.path()).unwrap();
        install_item(registry.path(), &items[0], &root, &mut config, "v1.2.0").unwrap();

        let reloaded = ProjectConfig::load(&root).unwrap().unwrap();
        assert_eq!(reloaded.project_types, config.project_types);
        assert_eq!(reloaded.registry, config.registry);
        assert_eq!(reloaded.installed, config.installed);
    }
}

mod update {
    use super::*;

    fn install_rules(registry: &TestRegistry, project: &TestProject, ids: &[&str]) {
        let items = get_registry_items(registry.path()).unwrap();
        let index = ItemIndex::new(&items);
        let (root, mut config) = load_project(project.path()).unwrap();
        for id in ids {
            let rule = index.require(ItemKind::Rule, id).unwrap();
            install_item(registry.path(), rule, &root, &mut config, "main").unwrap();
        }
    }

    #[test]
    fn test_update_skips_items_that_became_incompatible() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::rule("keep")).add(&MockItem::rule("drift"));
        let project = TestProject::initialized(&["backend"]);
        install_rules(&registry, &project, &["keep", "drift"]);

        // The registry moves on: drift is now data-only, keep gets a new version
        registry.add(&MockItem::rule("drift").with_project_types(&["data"]));
        registry.add(&MockItem::rule("keep").with_version("2.0.0"));

        let source = RegistrySource::Local(registry.path().to_path_buf());
        let (root, mut config) = load_project(project.path()).unwrap();

        let updated = update_all(&source, &root, &mut config).unwrap();
        assert_eq!(updated, vec![(ItemKind::Rule, "keep".to_string())]);

        let (_root, mut config) = load_project(project.path()).unwrap();
        assert_eq!(config.find_installed(ItemKind::Rule, "keep").unwrap().version, "2.0.0");
        assert_eq!(config.find_installed(ItemKind::Rule, "drift").unwrap().version, "1.0.0");

        let outcome = update_item(&source, &root, &mut config, ItemKind::Rule, "drift").unwrap();
        assert_eq!(outcome, UpdateOutcome::Incompatible);
        assert!(!outcome.is_updated());
    }

    #[test]
    fn test_update_skips_items_removed_from_registry() {
        let registry = TestRegistry::new();
        registry.add(&MockItem::rule("gone"));
        let project = TestProject::initialized(&["backend"]);
        install_rules(&registry, &project, &["gone"]);
        registry.remove("rules", "gone");

        let source = RegistrySource::Local(registry.path().to_path_buf());
        let (root, mut config) = load_project(project.path()).unwrap();

        assert!(update_all(&source, &root, &mut config).unwrap().is_empty());
        assertions::file_exists(&project.cursor_path("rules/gone/RULE.md"));
        assert_eq!(
            update_item(&source, &root, &mut config, ItemKind::Rule, "gone").unwrap(),
            UpdateOutcome::NotInRegistry
        );
    }
}
