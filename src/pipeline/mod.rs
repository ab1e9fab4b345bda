// Bootstrap pipeline
//
// Steps run strictly in sequence, each consuming the explicit context built
// by the ones before it. Every guard is a hard stop with a readable
// diagnostic; the only tolerated failure is the packaging-tool upgrade.

use crate::config::Config;
use crate::deps;
use crate::error::Result;
use crate::interpreter::{self, PythonVersion};
use crate::runner::CommandRunner;
use crate::sso;
use crate::venv::{self, VenvPaths};
use std::path::PathBuf;

/// State accumulated across pipeline steps, passed explicitly instead of
/// living in ambient process state.
#[derive(Debug, Clone)]
pub struct BootstrapContext {
    pub project_root: PathBuf,
    pub python_version: PythonVersion,
    pub venv: VenvPaths,
    pub requirements_in: PathBuf,
    pub requirements_lock: PathBuf,
}

pub struct Bootstrapper<'a> {
    config: Config,
    runner: &'a dyn CommandRunner,
    project_root: PathBuf,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(config: Config, runner: &'a dyn CommandRunner, project_root: PathBuf) -> Self {
        Self {
            config,
            runner,
            project_root,
        }
    }

    /// Environment preparation: interpreter check through dependency install.
    ///
    /// Split from the SSO step so `up --skip-login` and the standalone
    /// `login` subcommand can each reuse their half.
    pub fn prepare(&self) -> Result<BootstrapContext> {
        let minimum = self.config.minimum_version()?;
        let program = &self.config.python.program;

        // Nothing touches the filesystem until the version check passes
        let found = interpreter::probe(self.runner, program)?;
        found.ensure_at_least(minimum)?;
        tracing::info!("Python {} satisfies minimum {}", found, minimum);

        let venv = venv::ensure(self.runner, &self.project_root, program, minimum)?;

        deps::upgrade_tooling(self.runner, &venv);

        let requirements_in = self.project_root.join(&self.config.paths.requirements_in);
        let requirements_lock = self.project_root.join(&self.config.paths.requirements_lock);

        deps::compile_lock(self.runner, &venv, &requirements_in, &requirements_lock)?;
        deps::install_locked(self.runner, &venv, &requirements_lock)?;

        Ok(BootstrapContext {
            project_root: self.project_root.clone(),
            python_version: found,
            venv,
            requirements_in,
            requirements_lock,
        })
    }

    /// Full run: environment preparation, then the SSO credential bootstrap.
    pub async fn run(
        &self,
        profile_arg: Option<String>,
        skip_login: bool,
    ) -> Result<BootstrapContext> {
        let started = chrono::Utc::now();

        let context = self.prepare()?;

        if skip_login {
            tracing::debug!("Skipping SSO login");
        } else {
            let profile = sso::resolve_profile(profile_arg, &self.config)?;
            sso::login(self.runner, &profile).await?;
        }

        let elapsed = chrono::Utc::now() - started;
        tracing::info!("Bootstrap finished in {}s", elapsed.num_seconds());

        Ok(context)
    }
}
