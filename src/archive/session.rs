use fantoccini::{Client, ClientBuilder};

/// Opens a WebDriver session, trying common local ports when the
/// configured URL refuses connections
pub async fn connect(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("WebDriver session open at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::warn!("no WebDriver at {}: {}", webdriver_url, e);
        }
    }

    // Driver tools disagree on their default port
    let fallbacks = [
        "http://localhost:9515", // ChromeDriver
        "http://localhost:4444", // geckodriver, Selenium
        "http://127.0.0.1:4444",
    ];

    for url in fallbacks.iter().filter(|u| **u != webdriver_url) {
        ::log::info!("trying {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("WebDriver session open at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "no WebDriver server reachable; start chromedriver or geckodriver, or point WEBDRIVER_URL at one"
    );
    None
}
