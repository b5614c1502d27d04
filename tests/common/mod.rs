use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Wire form of one article as the backend returns it.
#[allow(dead_code)]
pub fn wire_article(id: u64, title: &str, description: &str) -> Value {
    json!({
        "id": id,
        "attributes": {
            "title": title,
            "description": description,
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-01T10:00:00.000Z",
            "publishedAt": "2024-03-01T10:00:00.000Z"
        }
    })
}

/// Successful `/auth/local` response.
#[allow(dead_code)]
pub fn auth_ok(jwt: &str, username: &str) -> Value {
    json!({
        "jwt": jwt,
        "user": {"id": 1, "username": username, "email": format!("{}@example.com", username)}
    })
}

/// Backend rejection body carrying `message`.
#[allow(dead_code)]
pub fn auth_error(status: u16, message: &str) -> Value {
    json!({
        "data": null,
        "error": {"status": status, "name": "ValidationError", "message": message}
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointing at `api_url` with the token kept in a file under `dir`.
#[allow(dead_code)]
pub fn file_backed_config(dir: &Path, api_url: &str) -> PathBuf {
    let config_path = dir.join("config.yaml");
    let token_path = dir.join("session.json");
    let contents = format!(
        "api:\n  base_url: {}\nstorage:\n  backend: file\n  path: {}\n",
        api_url,
        token_path.display()
    );
    fs::write(&config_path, contents).expect("failed to write config file");
    config_path
}
