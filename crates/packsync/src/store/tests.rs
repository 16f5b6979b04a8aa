//! Store and persister tests

use super::*;
use crate::registry::CompatibilityContext;

fn store_with_version(version_id: &str) -> MemoryStore {
    let store = MemoryStore::new();
    store.upsert_version(
        ModpackVersionRecord::new(version_id, "my-pack", "1.0.0")
            .with_context(CompatibilityContext::new(Some("1.20.1"), Some("fabric"))),
    );
    store
}

fn sample_mod(project_id: &str) -> ResolvedMod {
    ResolvedMod {
        project_id: project_id.to_string(),
        name: project_id.to_string(),
        icon_url: None,
        file_id: format!("{project_id}-file"),
        kind: crate::registry::ProjectKind::Mod,
        file_url: format!("https://cdn.test/{project_id}.jar"),
        file_name: format!("{project_id}.jar"),
        file_sha1: Some("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()),
        file_size: 1024,
        enabled: true,
    }
}

mod memory_store {
    use super::*;

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = store_with_version("v1");
        store.insert_mod("v1", &sample_mod("sodium")).await.unwrap();

        let err = store
            .insert_mod("v1", &sample_mod("sodium"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        // The first row is untouched.
        assert_eq!(store.list_mods("v1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn operations_on_missing_version_fail() {
        let store = MemoryStore::new();

        let err = store.list_mods("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::VersionNotFound { .. }));

        let err = store.insert_mod("ghost", &sample_mod("sodium")).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionNotFound { .. }));
    }

    #[tokio::test]
    async fn toggle_and_remove_require_an_installed_mod() {
        let store = store_with_version("v1");
        store.insert_mod("v1", &sample_mod("sodium")).await.unwrap();

        store.set_enabled("v1", "sodium", false).await.unwrap();
        let mods = store.list_mods("v1").await.unwrap();
        assert!(!mods[0].enabled);

        let err = store.set_enabled("v1", "lithium", true).await.unwrap_err();
        assert!(matches!(err, StoreError::ModNotFound { .. }));

        store.remove_mod("v1", "sodium").await.unwrap();
        assert!(store.list_mods("v1").await.unwrap().is_empty());

        let err = store.remove_mod("v1", "sodium").await.unwrap_err();
        assert!(matches!(err, StoreError::ModNotFound { .. }));
    }

    #[tokio::test]
    async fn installed_ids_reflect_inserted_rows() {
        let store = store_with_version("v1");
        store.insert_mod("v1", &sample_mod("sodium")).await.unwrap();
        store.insert_mod("v1", &sample_mod("lithium")).await.unwrap();

        let installed = store.installed_project_ids("v1").await.unwrap();
        assert_eq!(installed.len(), 2);
        assert!(installed.contains("sodium"));
        assert!(installed.contains("lithium"));
    }

    #[tokio::test]
    async fn version_target_can_be_set_and_cleared() {
        let store = store_with_version("v1");

        store.set_version_target("my-pack", Some("v1")).await.unwrap();
        assert_eq!(
            store.version_target("my-pack").await.unwrap(),
            Some("v1".to_string())
        );

        store.set_version_target("my-pack", None).await.unwrap();
        assert_eq!(store.version_target("my-pack").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_string_target_clears_instead_of_failing() {
        let store = store_with_version("v1");
        store.set_version_target("my-pack", Some("v1")).await.unwrap();

        // An empty id would never match a version row; it means "clear".
        store.set_version_target("my-pack", Some("")).await.unwrap();
        assert_eq!(store.version_target("my-pack").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_target_version_is_rejected() {
        let store = store_with_version("v1");
        let err = store
            .set_version_target("my-pack", Some("v2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionNotFound { .. }));
    }
}

mod persister {
    use super::*;

    #[tokio::test]
    async fn persists_new_rows_and_reports_them() {
        let store = store_with_version("v1");
        let mods = vec![sample_mod("sodium"), sample_mod("lithium")];

        let created = persist_resolution(&store, "v1", &mods).await.unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(store.list_mods("v1").await.unwrap(), mods);
    }

    #[tokio::test]
    async fn already_installed_mods_are_skipped() {
        let store = store_with_version("v1");
        store.insert_mod("v1", &sample_mod("sodium")).await.unwrap();

        let mods = vec![sample_mod("sodium"), sample_mod("lithium")];
        let created = persist_resolution(&store, "v1", &mods).await.unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(created[0].project_id, "lithium");
        assert_eq!(store.list_mods("v1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_persist_is_idempotent() {
        let store = store_with_version("v1");
        let mods = vec![sample_mod("sodium"), sample_mod("lithium")];

        persist_resolution(&store, "v1", &mods).await.unwrap();
        let created = persist_resolution(&store, "v1", &mods).await.unwrap();

        assert!(created.is_empty());
        assert_eq!(store.list_mods("v1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn intra_batch_duplicate_is_written_once() {
        let store = store_with_version("v1");
        let mods = vec![sample_mod("sodium"), sample_mod("sodium")];

        let created = persist_resolution(&store, "v1", &mods).await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(store.list_mods("v1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_version_is_a_hard_error() {
        let store = MemoryStore::new();
        let err = persist_resolution(&store, "ghost", &[sample_mod("sodium")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionNotFound { .. }));
    }
}
