//! Shared integration test helpers for gidtree.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::TestHome;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use gidtree::cli::{self, Cli, Context};
use gidtree_ssh::KeyAgent;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// Key agent that records requests instead of talking to ssh-agent.
#[derive(Clone, Default)]
pub struct RecordingAgent {
    pub loaded: Rc<RefCell<Vec<String>>>,
    pub unloaded: Rc<RefCell<Vec<String>>>,
}

impl KeyAgent for RecordingAgent {
    fn load_key(&self, key_path: &str) -> gidtree_ssh::Result<()> {
        self.loaded.borrow_mut().push(key_path.to_string());
        Ok(())
    }

    fn unload_key(&self, key_path: &str) -> gidtree_ssh::Result<()> {
        self.unloaded.borrow_mut().push(key_path.to_string());
        Ok(())
    }

    fn is_key_loaded(&self, key_path: &str) -> gidtree_ssh::Result<bool> {
        Ok(self.loaded.borrow().iter().any(|k| k == key_path))
    }
}

/// A throwaway home directory with a command context rooted in it.
///
/// The `TempDir` is removed when `TestHome` is dropped.
pub struct TestHome {
    pub dir: TempDir,
    pub agent: RecordingAgent,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            agent: RecordingAgent::default(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a directory under the home and return it as a string.
    pub fn project_dir(&self, name: &str) -> String {
        let dir = self.path().join(name);
        fs::create_dir_all(&dir).expect("Failed to create project dir");
        dir.to_string_lossy().into_owned()
    }

    /// Create a fake private key under `~/.ssh`.
    pub fn ssh_key(&self, name: &str) -> PathBuf {
        let ssh_dir = self.path().join(".ssh");
        fs::create_dir_all(&ssh_dir).expect("Failed to create .ssh");
        let key = ssh_dir.join(name);
        fs::write(&key, "fake key").expect("Failed to write key");
        key
    }

    /// Fresh context, reloading profiles and settings from disk.
    pub fn context(&self) -> Context {
        Context::with_home(self.path())
            .expect("Failed to build context")
            .with_agent(Box::new(self.agent.clone()))
    }

    /// Run a command line (without the program name) with `input` as stdin.
    pub fn run_with_input(&self, args: &[&str], input: &str) -> anyhow::Result<String> {
        let cli = <Cli as clap::Parser>::try_parse_from(
            std::iter::once("gidtree").chain(args.iter().copied()),
        )?;
        let mut ctx = self.context();
        let mut out = Vec::new();
        cli::execute(&mut ctx, cli.command, &mut out, &mut input.as_bytes())?;
        Ok(String::from_utf8(out)?)
    }

    pub fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        self.run_with_input(args, "")
    }

    pub fn git_config(&self) -> String {
        fs::read_to_string(self.path().join(".gitconfig")).unwrap_or_default()
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}
