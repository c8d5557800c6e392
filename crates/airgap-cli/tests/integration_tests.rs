//! Integration tests for CLI commands

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CONFIG_ERROR: i32 = 78;
const VALIDATION_ERROR: i32 = 2;

/// Run airgap in `dir` with a clean run environment
fn airgap(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_airgap"))
        .args(args)
        .current_dir(dir)
        .env_remove("MODE")
        .env_remove("ZONE")
        .env_remove("OPTION")
        .env_remove("SPRAY_RELEASE")
        .env_remove("SPRAY_COMMIT")
        .env_remove("MANIFEST_CONF")
        .env_remove("OFFLINEVERSION_CR_TEMPLATE")
        .env_remove("SPRAY_REPO_PATH")
        .env_remove("KUBEAN_TAG")
        .env_remove("DEPENDENCIES_URL_TEMPLATE")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute airgap")
}

fn workspace(manifest: Option<&str>) -> TempDir {
    let dir = TempDir::new().unwrap();
    if let Some(content) = manifest {
        fs::write(dir.path().join("manifest.yml"), content).unwrap();
    }
    dir
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod manifest_errors {
    use super::*;

    #[test]
    fn test_missing_manifest_is_a_config_error() {
        let dir = workspace(None);
        let output = airgap(dir.path(), &["build"]);

        assert_eq!(output.status.code(), Some(CONFIG_ERROR));
        assert!(stderr(&output).contains("Manifest not found"));
    }

    #[test]
    fn test_blank_manifest_is_a_config_error() {
        let dir = workspace(Some("\n  \n"));
        let output = airgap(dir.path(), &["build"]);

        assert_eq!(output.status.code(), Some(CONFIG_ERROR));
        assert!(stderr(&output).contains("Manifest is empty"));
    }

    #[test]
    fn test_unknown_key_fails_before_environment_checks() {
        // No kubespray checkout exists here; validation must fail first
        let dir = workspace(Some("kube_version: v1.28.0\nfoo_version: '1.0'\n"));
        let output = airgap(dir.path(), &["build"]);

        assert_eq!(output.status.code(), Some(VALIDATION_ERROR));
        let err = stderr(&output);
        assert!(err.contains("foo_version"));
        assert!(!err.contains("kubespray repo path not found"));
    }

    #[test]
    fn test_plan_rejects_unknown_key() {
        let dir = workspace(Some("etcd_verison: v3.5.9\n"));
        let output = airgap(dir.path(), &["plan", "--json"]);

        assert_eq!(output.status.code(), Some(VALIDATION_ERROR));
        assert!(stderr(&output).contains("etcd_version"));
    }

    #[test]
    fn test_manifest_path_from_environment() {
        let dir = workspace(None);
        fs::write(dir.path().join("custom.yml"), "bar_version: x\n").unwrap();

        let output = Command::new(env!("CARGO_BIN_EXE_airgap"))
            .arg("build")
            .current_dir(dir.path())
            .env("MANIFEST_CONF", "custom.yml")
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(VALIDATION_ERROR));
        assert!(stderr(&output).contains("bar_version"));
    }
}

mod environment {
    use super::*;

    #[test]
    fn test_missing_kubespray_checkout() {
        let dir = workspace(Some("kube_version: v1.28.0\n"));
        let output = airgap(dir.path(), &["build"]);

        assert_eq!(output.status.code(), Some(CONFIG_ERROR));
        assert!(stderr(&output).contains("kubespray repo path not found"));
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let dir = workspace(Some("kube_version: v1.28.0\n"));
        let output = airgap(dir.path(), &["build", "--mode", "partial"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("partial"));
    }

    #[test]
    fn test_help_lists_commands() {
        let dir = workspace(None);
        let output = airgap(dir.path(), &["--help"]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("build"));
        assert!(stdout.contains("plan"));
    }
}

mod plan_command {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn descriptor_server() -> MockServer {
        let server = MockServer::start().await;
        for version in ["v1.27.0", "v1.28.0"] {
            Mock::given(method("GET"))
                .and(path(format!("/{}/build/dependencies.yaml", version)))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    "dependencies:\n  - name: registry.k8s.io/pause\n    version: \"3.9\"\n",
                ))
                .mount(&server)
                .await;
        }
        server
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_plan_json_for_two_kube_versions() {
        let server = descriptor_server().await;
        let dir = workspace(Some("kube_version: [v1.27.0, v1.28.0]\nimage_arch: [amd64]\n"));
        let template = format!("{}/{{version}}/build/dependencies.yaml", server.uri());

        let output = airgap(
            dir.path(),
            &["plan", "--json", "--descriptor-url", &template],
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let json: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");

        assert_eq!(json["mode"], "INCR");
        assert_eq!(json["plan"]["architectures"], serde_json::json!(["amd64"]));
        let jobs = json["plan"]["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[1]["extraVars"],
            serde_json::json!(["kube_version='v1.28.0'", "pod_infra_version='3.9'"])
        );
        assert_eq!(json["manifest"]["pod_infra_version"], serde_json::json!(["3.9", "3.9"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_plan_fails_when_descriptor_is_missing() {
        let server = MockServer::start().await;
        let dir = workspace(Some("kube_version: v1.99.0\n"));
        let template = format!("{}/{{version}}/build/dependencies.yaml", server.uri());

        let output = airgap(dir.path(), &["plan", "--descriptor-url", &template]);

        assert_eq!(output.status.code(), Some(69));
        assert!(stderr(&output).contains("404"));
    }
}

#[cfg(unix)]
mod build_command {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEMPLATE: &str = r#"apiVersion: kubean.io/v1alpha1
kind: LocalArtifactSet
metadata:
  name: localartifactset-template
spec:
  docker:
    - os: redhat-7
      versionRange: ["20.10"]
  items:
    - name: kube
      versionRange: []
    - name: etcd
      versionRange: []
"#;

    const GENERATE_LIST: &str = r#"mkdir -p contrib/offline/temp
cat > contrib/offline/temp/files.list <<LIST
https://dl.k8s.io/release/v1.28.0/bin/linux/amd64/kubelet
https://github.com/etcd-io/etcd/releases/download/v3.5.9/etcd-v3.5.9-linux-amd64.tar.gz
https://github.com/mikefarah/yq/releases/download/v4.35.2/yq_linux_amd64
LIST
cat > contrib/offline/temp/images.list <<LIST
registry.k8s.io/kube-proxy:v1.28.0
registry.k8s.io/pause:3.9
quay.io/calico/node:v3.26.1
LIST
"#;

    /// A working directory with a fake Kubespray checkout and a fake skopeo
    fn bundle_workspace(manifest: &str) -> (TempDir, String) {
        let dir = workspace(Some(manifest));
        let offline = dir.path().join("kubespray/contrib/offline");
        fs::create_dir_all(&offline).unwrap();
        fs::write(offline.join("generate_list.sh"), GENERATE_LIST).unwrap();

        let template_dir = dir.path().join("artifacts/template");
        fs::create_dir_all(&template_dir).unwrap();
        fs::write(template_dir.join("localartifactset.template.yml"), TEMPLATE).unwrap();

        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let skopeo = bin.join("skopeo");
        fs::write(&skopeo, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&skopeo, fs::Permissions::from_mode(0o755)).unwrap();

        let path = format!("{}:{}", bin.display(), std::env::var("PATH").unwrap_or_default());
        (dir, path)
    }

    async fn descriptor_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "dependencies:\n  - name: registry.k8s.io/pause\n    version: \"3.9\"\n",
            ))
            .mount(&server)
            .await;
        server
    }

    fn build(dir: &Path, path_env: &str, extra: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_airgap"))
            .arg("build")
            .arg("--skip-package")
            .args(extra)
            .current_dir(dir)
            .env("PATH", path_env)
            .env("NO_COLOR", "1")
            .env_remove("MODE")
            .env_remove("ZONE")
            .env_remove("OPTION")
            .env_remove("SPRAY_RELEASE")
            .env_remove("SPRAY_COMMIT")
            .env_remove("MANIFEST_CONF")
            .env_remove("OFFLINEVERSION_CR_TEMPLATE")
            .env_remove("SPRAY_REPO_PATH")
            .env_remove("KUBEAN_TAG")
            .output()
            .expect("Failed to execute airgap")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_incr_build_selects_kube_artifacts_and_writes_cr() {
        let server = descriptor_server().await;
        let (dir, path_env) = bundle_workspace("kube_version: v1.28.0\n");
        let template = format!("{}/{{version}}/build/dependencies.yaml", server.uri());

        let output = build(dir.path(), &path_env, &["--descriptor-url", &template]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("* https://dl.k8s.io/release/v1.28.0/bin/linux/amd64/kubelet"));
        assert!(stdout.contains("* registry.k8s.io/pause:3.9"));
        assert!(!stdout.contains("etcd-v3.5.9"));
        assert!(!stdout.contains("calico"));

        let cr = fs::read_to_string(dir.path().join("airgap_patch/localartifactset.cr.yaml")).unwrap();
        let cr: serde_json::Value = serde_yaml_to_json(&cr);
        assert_eq!(cr["metadata"]["labels"]["kubean.io/sprayRelease"], "master");
        assert_eq!(cr["spec"]["docker"], serde_json::json!([]));
        assert_eq!(cr["spec"]["items"][0]["versionRange"], serde_json::json!(["v1.28.0"]));
        assert_eq!(cr["spec"]["items"][1]["versionRange"], serde_json::json!([]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_full_build_adds_catch_all_and_default_ranges() {
        let server = descriptor_server().await;
        let (dir, path_env) = bundle_workspace("kube_version: v1.28.0\n");
        let template = format!("{}/{{version}}/build/dependencies.yaml", server.uri());

        let output = build(
            dir.path(),
            &path_env,
            &["--descriptor-url", &template, "--mode", "FULL", "--spray-release", "v2.23.0"],
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("etcd-v3.5.9"));
        assert!(stdout.contains("yq_linux_amd64"));
        assert!(stdout.contains("quay.io/calico/node:v3.26.1"));

        let cr = fs::read_to_string(dir.path().join("airgap_patch/localartifactset.cr.yaml")).unwrap();
        let cr = serde_yaml_to_json(&cr);
        assert_eq!(cr["metadata"]["labels"]["kubean.io/sprayRelease"], "v2.23.0");
        assert!(cr["metadata"]["name"].as_str().unwrap().starts_with("localartifactset-v2.23.0-"));
        assert_eq!(cr["spec"]["items"][1]["versionRange"], serde_json::json!(["default"]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_generator_failure_surfaces_output() {
        let server = descriptor_server().await;
        let (dir, path_env) = bundle_workspace("kube_version: v1.28.0\n");
        fs::write(
            dir.path().join("kubespray/contrib/offline/generate_list.sh"),
            "echo 'inventory missing' >&2\nexit 4\n",
        )
        .unwrap();
        let template = format!("{}/{{version}}/build/dependencies.yaml", server.uri());

        let output = build(dir.path(), &path_env, &["--descriptor-url", &template]);

        assert_eq!(output.status.code(), Some(70));
        assert!(stderr(&output).contains("inventory missing"));
        assert!(!dir.path().join("airgap_patch/localartifactset.cr.yaml").exists());
    }

    /// The CR is YAML; compare through JSON values
    fn serde_yaml_to_json(content: &str) -> serde_json::Value {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content).unwrap();
        serde_json::to_value(yaml).unwrap()
    }
}
