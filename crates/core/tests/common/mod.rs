#![allow(dead_code)]

use async_trait::async_trait;
use proscenium_core::api::{BundleEngine, CompileRequest};
use proscenium_core::{Config, Resolver};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// A throwaway application tree:
///
/// ```text
/// <tmp>/app                 application root
/// <tmp>/app/node_modules    package store
/// <tmp>/gems/ui             gem root "ui"
/// ```
pub struct Fixture {
    _temp: TempDir,
    pub base: PathBuf,
    pub app: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path().to_path_buf();
        let app = base.join("app");
        std::fs::create_dir_all(app.join("node_modules")).unwrap();
        std::fs::create_dir_all(base.join("gems/ui")).unwrap();

        let fixture = Self {
            _temp: temp,
            base,
            app,
        };
        fixture.write("app/lib/css_modules/basic.module.css", ".title { color: red; }\n");
        fixture.write("app/lib/css_modules/basic2.module.css", ".title { color: blue; }\n");
        fixture
    }

    /// Write `content` to `rel` under the fixture base, creating parents.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.base.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn gem_dir(&self, name: &str) -> PathBuf {
        self.base.join("gems").join(name)
    }

    pub fn config(&self) -> Config {
        Config::new(&self.app).with_engine("ui", self.gem_dir("ui"))
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::from_config(&self.config()).unwrap()
    }
}

/// Records every request and answers after a short delay.
pub struct CountingEngine {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<CompileRequest>>,
    delay: Duration,
    failure: Option<String>,
}

impl CountingEngine {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            delay: Duration::from_millis(100),
            failure: None,
        }
    }

    pub fn failing(diagnostic: &str) -> Self {
        Self {
            failure: Some(diagnostic.to_string()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BundleEngine for CountingEngine {
    async fn compile(&self, request: CompileRequest) -> Result<Vec<u8>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let output = format!("// compiled {} ({})", request.entry, request.bundle.as_str());
        self.requests.lock().unwrap().push(request);
        tokio::time::sleep(self.delay).await;
        match &self.failure {
            Some(diagnostic) => Err(diagnostic.clone()),
            None => Ok(output.into_bytes()),
        }
    }

    fn name(&self) -> &str {
        "counting"
    }
}
