use fortunecookie::config::Config;
use fortunecookie::fortune::FortuneList;
mod common;

#[tokio::test]
async fn missing_config_falls_back_to_defaults() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.toml");
    let config = Config::load_or_default(path.to_str().unwrap())
        .await
        .expect("defaults");
    assert_eq!(config.storage.data_dir, "./data");
    assert!(Config::load(path.to_str().unwrap()).await.is_err());
}

#[tokio::test]
async fn create_default_then_load() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.toml");
    let path = path.to_str().unwrap();
    Config::create_default(path).await.expect("create");
    let config = Config::load(path).await.expect("load");
    assert_eq!(config.links.base_url, "https://yourdomain.example/");
    assert_eq!(config.fortune_list().unwrap(), FortuneList::builtin());
}

#[tokio::test]
async fn malformed_config_is_an_error() {
    let (_tmp, path) = common::temp_file("config.toml", "[storage\ndata_dir = 1");
    let err = Config::load_or_default(path.to_str().unwrap())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[tokio::test]
async fn configured_list_file_is_used() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let list_path = tmp.path().join("cookies.txt");
    std::fs::write(&list_path, "Alpha\nBeta\n").unwrap();
    let cfg_path = tmp.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        format!(
            "[fortunes]\nfile = {:?}\n\n[storage]\ndata_dir = {:?}\n",
            list_path.to_str().unwrap(),
            tmp.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let config = Config::load(cfg_path.to_str().unwrap()).await.expect("load");
    let list = config.fortune_list().expect("list");
    assert_eq!(list.iter().collect::<Vec<_>>(), vec!["Alpha", "Beta"]);
}
