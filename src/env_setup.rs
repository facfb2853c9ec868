use std::fs::File;
use std::io::Write;
use std::path::Path;

const DEFAULT_ENV: &str = r#"
API_URL="http://127.0.0.1:9000"
CURRENCY="BTC"
FETCH_TIMEOUT_SECONDS=30
SERVER_PORT=8080
RUST_LOG=info
"#;

/// Writes a `.env` with default settings unless one already exists.
pub fn setup_env() -> std::io::Result<()> {
    write_default_env(Path::new(".env"))
}

fn write_default_env(env_path: &Path) -> std::io::Result<()> {
    if !env_path.exists() {
        let mut file = File::create(env_path)?;
        file.write_all(DEFAULT_ENV.as_bytes())?;
        println!("[Env] Created {} with default configurations.", env_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_overwrites_an_existing_file() {
        let path = std::env::temp_dir().join(format!("lnsearch-env-{}", std::process::id()));
        std::fs::write(&path, "API_URL=\"https://mine.example\"\n").unwrap();

        write_default_env(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(content, "API_URL=\"https://mine.example\"\n");
    }
}
