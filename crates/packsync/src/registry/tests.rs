//! Registry client tests against a mock Modrinth server

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::config::SyncConfig;
use crate::registry::modrinth::ModrinthRegistry;

fn client_for(server: &MockServer) -> ModrinthRegistry {
    ModrinthRegistry::with_base_url(&SyncConfig::default(), server.uri())
        .expect("client construction")
}

fn context() -> CompatibilityContext {
    CompatibilityContext::new(Some("1.20.1"), Some("fabric"))
}

mod get_project {
    use super::*;

    #[tokio::test]
    async fn parses_metadata_and_canonical_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/fabric-api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "P7dR8mSH",
                "slug": "fabric-api",
                "title": "Fabric API",
                "icon_url": "https://cdn.modrinth.com/icon.png",
                "project_type": "mod"
            })))
            .mount(&server)
            .await;

        let meta = client_for(&server).get_project("fabric-api").await.unwrap();

        assert_eq!(meta.id, "P7dR8mSH");
        assert_eq!(meta.slug, "fabric-api");
        assert_eq!(meta.title, "Fabric API");
        assert_eq!(meta.icon_url.as_deref(), Some("https://cdn.modrinth.com/icon.png"));
        assert_eq!(meta.kind, ProjectKind::Mod);
    }

    #[tokio::test]
    async fn unknown_project_type_maps_to_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/weird"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "x",
                "slug": "weird",
                "title": "Weird",
                "icon_url": null,
                "project_type": "plugin"
            })))
            .mount(&server)
            .await;

        let meta = client_for(&server).get_project("weird").await.unwrap();
        assert_eq!(meta.kind, ProjectKind::Unknown);
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).get_project("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn server_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/fabric-api"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).get_project("fabric-api").await.unwrap_err();
        assert!(matches!(err, RegistryError::Upstream { .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/fabric-api"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_project("fabric-api").await.unwrap_err();
        assert!(matches!(err, RegistryError::Upstream { .. }));
    }
}

mod get_versions {
    use super::*;

    #[tokio::test]
    async fn encodes_context_as_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/P7dR8mSH/version"))
            .and(query_param("game_versions", "[\"1.20.1\"]"))
            .and(query_param("loaders", "[\"fabric\"]"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = client_for(&server)
            .get_versions("P7dR8mSH", &context())
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn picks_primary_file_and_maps_dependencies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/P7dR8mSH/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "ver-1",
                    "dependencies": [
                        { "project_id": "cloth", "dependency_type": "required" },
                        { "project_id": "optifine", "dependency_type": "incompatible" },
                        { "project_id": null, "dependency_type": "required" }
                    ],
                    "files": [
                        {
                            "url": "https://cdn.test/sources.jar",
                            "filename": "sources.jar",
                            "primary": false,
                            "size": 10,
                            "hashes": { "sha1": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" }
                        },
                        {
                            "url": "https://cdn.test/fabric-api.jar",
                            "filename": "fabric-api.jar",
                            "primary": true,
                            "size": 2048,
                            "hashes": { "sha1": "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" }
                        }
                    ]
                }
            ])))
            .mount(&server)
            .await;

        let candidates = client_for(&server)
            .get_versions("P7dR8mSH", &context())
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.file_id, "ver-1");
        assert_eq!(candidate.file_name, "fabric-api.jar");
        assert_eq!(candidate.url, "https://cdn.test/fabric-api.jar");
        assert_eq!(
            candidate.sha1.as_deref(),
            Some("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb")
        );
        assert_eq!(candidate.size, 2048);

        assert_eq!(candidate.dependencies.len(), 3);
        let required: Vec<_> = candidate.required_dependencies().collect();
        assert_eq!(required.len(), 2);
        assert_eq!(required[0].project_id.as_deref(), Some("cloth"));
        assert_eq!(required[1].project_id, None);
    }

    #[tokio::test]
    async fn falls_back_to_first_file_and_drops_fileless_versions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/P7dR8mSH/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "ver-empty",
                    "dependencies": [],
                    "files": []
                },
                {
                    "id": "ver-2",
                    "files": [
                        { "url": "https://cdn.test/a.jar", "filename": "a.jar" },
                        { "url": "https://cdn.test/b.jar", "filename": "b.jar" }
                    ]
                }
            ])))
            .mount(&server)
            .await;

        let candidates = client_for(&server)
            .get_versions("P7dR8mSH", &context())
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_id, "ver-2");
        assert_eq!(candidates[0].file_name, "a.jar");
        // Omitted hash and size fall back to the defaults.
        assert_eq!(candidates[0].sha1, None);
        assert_eq!(candidates[0].size, 0);
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/ghost/version"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_versions("ghost", &context())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unconstrained_context_sends_no_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/project/P7dR8mSH/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let candidates = client_for(&server)
            .get_versions("P7dR8mSH", &CompatibilityContext::default())
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}
