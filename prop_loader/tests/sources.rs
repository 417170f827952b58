//! Built-in sources driven through the loader.

mod common;

use std::time::Duration;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use common::{Recorded, recorded, required, required_in_order};
use futures::stream;
use prop_loader::{
    EnvSource, FileSource, FnSource, Loader, PropertyService, PropertySource, SourceLoad,
    SourceOptions,
};
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<Utf8PathBuf> {
    let path = Utf8PathBuf::from_path_buf(dir.path().join(name))
        .map_err(|p| anyhow::anyhow!("non UTF-8 temp path {}", p.display()))?;
    std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
    Ok(path)
}

#[rstest]
#[tokio::test]
async fn file_sources_layer_in_order(recorded: Recorded) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let defaults = write(
        &dir,
        "defaults.toml",
        "[server]\nhost = \"0.0.0.0\"\nport = 8080\n\n[features]\nenabled = [\"search\"]\n",
    )?;
    let local = write(
        &dir,
        "local.json",
        r#"{"server": {"port": 9090}, "features": {"enabled": ["beta"]}}"#,
    )?;

    let loader = Loader::builder(recorded.service.clone())
        .source(FileSource::new(defaults).with_options(required_in_order()))
        .source(FileSource::new(local).with_options(required_in_order().deep_merge_values(true)))
        .build();
    loader.load().await?;

    assert_eq!(
        recorded.service.properties(),
        json!({
            "server": {"host": "0.0.0.0", "port": 9090},
            "features": {"enabled": ["search", "beta"]}
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn missing_required_file_names_the_source(recorded: Recorded) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.toml"))
        .map_err(|p| anyhow::anyhow!("non UTF-8 temp path {}", p.display()))?;
    let source = FileSource::new(path.clone()).with_options(required());
    assert_eq!(source.name(), format!("FileSource({path})"));

    let err = Loader::builder(recorded.service.clone())
        .source(source)
        .build()
        .load()
        .await
        .expect_err("missing file");
    assert!(err.to_string().contains("absent.toml"), "{err}");
    assert_eq!(recorded.store.write_count(), 0);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn optional_broken_file_is_skipped(recorded: Recorded) -> Result<()> {
    let dir = tempfile::tempdir()?;
    let broken = write(&dir, "broken.toml", "port = ")?;
    let good = write(&dir, "good.json", r#"{"port": 1}"#)?;

    Loader::builder(recorded.service.clone())
        .source(FileSource::new(broken).with_options(SourceOptions::default().load_in_order(true)))
        .source(FileSource::new(good).with_options(required_in_order()))
        .build()
        .load()
        .await?;
    assert_eq!(recorded.service.properties(), json!({"port": 1}));
    Ok(())
}

#[test]
fn env_source_feeds_the_loader() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("SHOP_API__BASE_URL", "https://api.example.org");
        jail.set_env("SHOP_API__RETRIES", "3");
        jail.set_env("SHOP_DEBUG", "true");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| figment::Error::from(e.to_string()))?;
        let service = PropertyService::in_memory();
        let loader = Loader::builder(service.clone())
            .source(EnvSource::prefixed("SHOP_").with_options(required().path("env")))
            .build();
        runtime
            .block_on(loader.load())
            .map_err(|e| figment::Error::from(e.to_string()))?;

        assert_eq!(
            service.properties(),
            json!({"env": {
                "api": {"base_url": "https://api.example.org", "retries": 3},
                "debug": true
            }})
        );
        Ok(())
    });
}

#[test]
fn env_source_separator_is_configurable() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("SVC_DB_HOST", "db");
        let collected = EnvSource::prefixed("SVC_")
            .separator("_")
            .collect()
            .map_err(|e| figment::Error::from(e.to_string()))?;
        assert_eq!(collected, json!({"db": {"host": "db"}}));
        Ok(())
    });
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn closure_sources_cover_every_shape(recorded: Recorded) -> Result<()> {
    let loader = Loader::builder(recorded.service.clone())
        .source(
            FnSource::new("list", || vec![json!({"list": [1]}), json!({"list": [2]})].into())
                .with_options(required_in_order().deep_merge_values(true)),
        )
        .source(
            FnSource::new("stream", || {
                SourceLoad::stream(stream::iter([
                    Ok::<_, std::io::Error>(json!({"stream": "first"})),
                    Ok(json!({"stream": "second"})),
                ]))
            })
            .with_options(required_in_order()),
        )
        .source(
            FnSource::new("future", || {
                SourceLoad::future(async {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Ok::<_, std::io::Error>(json!({"future": true}))
                })
            })
            .with_options(required()),
        )
        .source(FnSource::new("throws", || SourceLoad::failed("synchronous failure")))
        .build();

    loader.load().await?;
    assert_eq!(
        recorded.service.properties(),
        json!({"list": [1, 2], "stream": "second", "future": true})
    );
    Ok(())
}
