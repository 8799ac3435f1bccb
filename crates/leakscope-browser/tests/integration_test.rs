use leakscope_browser::SearchBrowser;
use leakscope_core::ScanConfig;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_browser_launch() {
    let config = ScanConfig::default();
    let browser = SearchBrowser::launch(&config).await;
    assert!(browser.is_ok(), "Failed to launch browser");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_fetch_text() {
    let config = ScanConfig::default();
    let browser = SearchBrowser::launch(&config).await.unwrap();

    let content = browser.fetch_text("https://example.com").await.unwrap();
    assert!(content.is_textual());
    assert!(content.body.contains("Example Domain"));
}
