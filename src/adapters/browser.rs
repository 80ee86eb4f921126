use crate::config::RunnerConfig;
use crate::domain::ports::{BrowserLauncher, Page};
use crate::utils::error::{ClaimError, Result};
use async_trait::async_trait;
use headless_chrome::browser::FetcherOptions;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, LaunchOptionsBuilder, Tab};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DOWNLOAD_DIR_NAME: &str = "reward-runner-chromium";

/// Where the browser binary for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableSource {
    Found(PathBuf),
    /// Nothing installed; Chromium is fetched into `install_dir` on launch.
    Download { install_dir: PathBuf },
}

/// Launches headless Chrome with one tab.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    chrome_path: Option<String>,
    headless: bool,
    step_timeout: Duration,
    install_dir: PathBuf,
}

impl ChromeLauncher {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            headless: config.headless,
            step_timeout: config.step_timeout(),
            install_dir: std::env::temp_dir().join(DOWNLOAD_DIR_NAME),
        }
    }

    /// Explicit path, then `CHROME_PATH`, then the usual install locations,
    /// and finally a Chromium download.
    pub fn resolve_executable(&self) -> Result<ExecutableSource> {
        resolve_with(
            self.chrome_path.as_deref(),
            std::env::var("CHROME_PATH").ok(),
            headless_chrome::browser::default_executable,
            &self.install_dir,
        )
    }

    fn launch_options(&self, source: &ExecutableSource) -> Result<LaunchOptions<'static>> {
        // Lambda and containers have no sandbox and a tiny /dev/shm
        let extra_args: Vec<&'static OsStr> = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-gpu"),
        ];

        let mut builder = LaunchOptionsBuilder::default();
        builder
            .headless(self.headless)
            .window_size(Some((1920, 1080)))
            .args(extra_args)
            // the inbox poll can keep the page quiet for close to a minute
            .idle_browser_timeout(Duration::from_secs(300));

        match source {
            ExecutableSource::Found(path) => {
                builder.path(Some(path.clone()));
            }
            ExecutableSource::Download { install_dir } => {
                builder.path(None).fetcher_options(
                    FetcherOptions::default()
                        .with_install_dir(Some(install_dir.clone()))
                        .with_allow_download(true),
                );
            }
        }

        builder.build().map_err(|e| ClaimError::EnvironmentSetup {
            message: e.to_string(),
        })
    }
}

fn resolve_with<D>(
    explicit: Option<&str>,
    from_env: Option<String>,
    detect: D,
    install_dir: &Path,
) -> Result<ExecutableSource>
where
    D: FnOnce() -> std::result::Result<PathBuf, String>,
{
    if let Some(name) = explicit {
        return locate(name).map(ExecutableSource::Found);
    }
    if let Some(name) = from_env.filter(|v| !v.trim().is_empty()) {
        return locate(&name).map(ExecutableSource::Found);
    }
    match detect() {
        Ok(path) => Ok(ExecutableSource::Found(path)),
        Err(reason) => {
            tracing::debug!("no installed browser found: {}", reason);
            Ok(ExecutableSource::Download {
                install_dir: install_dir.to_path_buf(),
            })
        }
    }
}

/// Bare command names go through `PATH`; anything with a separator must exist as given.
fn locate(name: &str) -> Result<PathBuf> {
    let path = Path::new(name);
    if path.components().count() == 1 {
        return which::which(name).map_err(|e| ClaimError::EnvironmentSetup {
            message: format!("browser executable {} not found on PATH: {}", name, e),
        });
    }
    if !path.exists() {
        return Err(ClaimError::EnvironmentSetup {
            message: format!("browser executable not found at {}", path.display()),
        });
    }
    Ok(path.to_path_buf())
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    type Page = ChromePage;

    fn prepare(&self) -> Result<()> {
        match self.resolve_executable()? {
            ExecutableSource::Found(path) => {
                tracing::debug!("using browser executable {}", path.display());
            }
            ExecutableSource::Download { install_dir } => {
                tracing::info!(
                    "no browser installed, Chromium will be downloaded to {}",
                    install_dir.display()
                );
            }
        }
        Ok(())
    }

    async fn launch(&self) -> Result<ChromePage> {
        let source = self.resolve_executable()?;
        let launch_options = self.launch_options(&source)?;

        // a failed Chromium download surfaces here too
        let browser = Browser::new(launch_options).map_err(|e| ClaimError::EnvironmentSetup {
            message: format!("could not launch browser: {}", e),
        })?;

        let tab = browser.new_tab().map_err(|e| ClaimError::Browser {
            message: format!("could not create page: {}", e),
        })?;
        tab.set_default_timeout(self.step_timeout);

        Ok(ChromePage { _browser: browser, tab })
    }
}

pub struct ChromePage {
    // the browser process lives as long as the page
    _browser: Browser,
    tab: Arc<Tab>,
}

fn interaction(selector: &str, err: impl std::fmt::Display) -> ClaimError {
    ClaimError::Interaction {
        selector: selector.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| ClaimError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|e| interaction(selector, e))?;
        element.click().map_err(|e| interaction(selector, e))?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|e| interaction(selector, e))?;
        element
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .map_err(|e| interaction(selector, e))?;
        element.type_into(text).map_err(|e| interaction(selector, e))?;
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> Result<String> {
        let element = self
            .tab
            .wait_for_element(selector)
            .map_err(|e| interaction(selector, e))?;
        let remote = element
            .call_js_fn("function() { return this.textContent; }", vec![], false)
            .map_err(|e| interaction(selector, e))?;

        Ok(remote
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| ClaimError::Browser {
                message: format!("could not create screenshot: {}", e),
            })
    }

    async fn wait(&self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn bring_to_front(&self) -> Result<()> {
        self.tab.bring_to_front().map_err(|e| ClaimError::Browser {
            message: format!("could not bring page to front: {}", e),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    fn no_browser() -> std::result::Result<PathBuf, String> {
        Err("Could not auto detect a chrome executable".to_string())
    }

    #[test]
    fn test_explicit_chrome_path_wins() {
        let binary = NamedTempFile::new().unwrap();
        let explicit = binary.path().to_str().unwrap();

        let source = resolve_with(
            Some(explicit),
            Some("/from/env/chrome".to_string()),
            no_browser,
            Path::new("/tmp/unused"),
        )
        .unwrap();

        assert_eq!(source, ExecutableSource::Found(binary.path().to_path_buf()));
    }

    #[test]
    fn test_missing_executable_is_setup_error() {
        let config = RunnerConfig {
            chrome_path: Some("/definitely/not/here/chrome".to_string()),
            ..RunnerConfig::default()
        };
        let err = ChromeLauncher::new(&config).prepare().unwrap_err();
        assert!(matches!(err, ClaimError::EnvironmentSetup { .. }));
    }

    #[test]
    fn test_undetected_browser_falls_back_to_download() {
        let dir = TempDir::new().unwrap();

        let source = resolve_with(None, None, no_browser, dir.path()).unwrap();

        assert_eq!(
            source,
            ExecutableSource::Download {
                install_dir: dir.path().to_path_buf()
            }
        );
    }

    #[test]
    fn test_download_launch_options_use_fetcher() {
        let dir = TempDir::new().unwrap();
        let launcher = ChromeLauncher::new(&RunnerConfig::default());
        let source = ExecutableSource::Download {
            install_dir: dir.path().to_path_buf(),
        };

        let options = launcher.launch_options(&source).unwrap();

        assert!(options.path.is_none());
        assert_eq!(
            options.fetcher_options,
            FetcherOptions::default()
                .with_install_dir(Some(dir.path().to_path_buf()))
                .with_allow_download(true)
        );
    }

    #[test]
    fn test_blank_env_path_is_ignored() {
        let dir = TempDir::new().unwrap();

        let source = resolve_with(None, Some("  ".to_string()), no_browser, dir.path()).unwrap();

        assert!(matches!(source, ExecutableSource::Download { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_command_name_resolves_through_path() {
        let source = resolve_with(None, Some("sh".to_string()), no_browser, Path::new("/tmp")).unwrap();

        match source {
            ExecutableSource::Found(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("sh"));
            }
            other => panic!("expected a found executable, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_bare_command_name_is_setup_error() {
        let err = resolve_with(
            None,
            Some("no-such-browser-binary-xyz".to_string()),
            no_browser,
            Path::new("/tmp"),
        )
        .unwrap_err();

        assert!(matches!(err, ClaimError::EnvironmentSetup { .. }));
        assert!(err.to_string().contains("PATH"));
    }
}
