//! One-call wrappers: environment → record → arguments → child process.
//!
//! [`Runner::exec`] handles tools with a single parameter record.
//! [`Runner::exec_command`] handles tools with subcommands (`helm repo add`):
//! it reads `PLUGIN_COMMAND` / `PLUGIN_SUBCOMMAND` first, picks the matching
//! variant of a [`CommandSet`], then runs that.
use crate::Error;
use crate::args::Serializer;
use crate::env::{Deserializer, Vars};
use crate::exec::{Invocation, Launcher};
use crate::logging::DRY_RUN_TARGET;
use crate::names::Initialisms;
use crate::record::Record;

crate::record! {
    /// The command (and optional subcommand) to run.
    ///
    /// Embed it as the first field of command parameter records so the words
    /// are emitted ahead of every flag.
    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct Command {
        /// First word, from `PLUGIN_COMMAND`.
        pub command: String = ",positional",
        /// Second word, from `PLUGIN_SUBCOMMAND`.
        pub subcommand: String = ",positional",
    }
}

impl Command {
    /// Dispatch key: `"command"` or `"command subcommand"`.
    #[must_use]
    pub fn key(&self) -> String {
        if self.subcommand.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.subcommand)
        }
    }
}

/// A closed set of parameter records selected by command key.
///
/// Usually generated by [`command_set!`](crate::command_set!).
pub trait CommandSet: Sized {
    /// Every key [`select`](Self::select) accepts.
    fn keys() -> &'static [&'static str];

    /// A default parameter record for `key`, if one is registered.
    fn select(key: &str) -> Option<Self>;

    /// The selected record.
    fn record(&self) -> &dyn Record;

    /// The selected record, mutably.
    fn record_mut(&mut self) -> &mut dyn Record;
}

/// Declare an enum of parameter records and implement [`CommandSet`] for it.
///
/// # Examples
///
/// ```
/// use drone_plugin_helper::runner::{Command, CommandSet};
/// use drone_plugin_helper::{command_set, record};
///
/// record! {
///     #[derive(Debug, Default)]
///     pub struct Global {
///         pub command: Command,
///         pub debug: bool,
///     }
/// }
///
/// command_set! {
///     #[derive(Debug)]
///     pub enum Tool {
///         "version" => Version(Global),
///         "repo list" => RepoList(Global),
///     }
/// }
///
/// assert!(Tool::select("repo list").is_some());
/// assert!(Tool::select("bogus").is_none());
/// ```
#[macro_export]
macro_rules! command_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $key:literal => $variant:ident($ty:ty) ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                #[doc = concat!("Parameters for `", $key, "`.")]
                $variant($ty),
            )*
        }

        impl $crate::runner::CommandSet for $name {
            fn keys() -> &'static [&'static str] {
                &[$($key),*]
            }

            fn select(key: &str) -> ::core::option::Option<Self> {
                match key {
                    $( $key => ::core::option::Option::Some(
                        Self::$variant(<$ty as ::core::default::Default>::default()),
                    ), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn record(&self) -> &dyn $crate::record::Record {
                match self {
                    $( Self::$variant(params) => params, )*
                }
            }

            fn record_mut(&mut self) -> &mut dyn $crate::record::Record {
                match self {
                    $( Self::$variant(params) => params, )*
                }
            }
        }
    };
}

/// How the runner treats parameters and the final invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Fail when a parameter matches no field.
    pub strict: bool,
    /// Build the invocation but do not launch it.
    pub dry_run: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Nothing was launched.
    DryRun,
    /// The child exited with this code.
    Exited(i32),
    /// The child was terminated by a signal.
    Signalled,
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// What was (or would have been) launched.
    pub invocation: Invocation,
    /// How it ended.
    pub completion: Completion,
}

impl Outcome {
    /// Whether the run counts as successful.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.completion, Completion::DryRun | Completion::Exited(0))
    }
}

/// Ties the deserializer, serializer and a [`Launcher`] together.
#[derive(Debug)]
pub struct Runner<'i, L> {
    settings: Settings,
    initialisms: &'i Initialisms,
    launcher: L,
}

impl<'i, L: Launcher> Runner<'i, L> {
    /// Create a runner.
    #[must_use]
    pub const fn new(settings: Settings, initialisms: &'i Initialisms, launcher: L) -> Self {
        Self {
            settings,
            initialisms,
            launcher,
        }
    }

    /// Fill `params` from `vars` and build the invocation of `program`.
    ///
    /// # Errors
    ///
    /// - [`Error::Conversion`] / [`Error::Schema`] from deserialization or
    ///   serialization
    /// - [`Error::Unused`] in strict mode when a parameter matched nothing
    pub fn prepare(
        &self,
        program: &str,
        vars: &Vars,
        params: &mut dyn Record,
    ) -> Result<Invocation, Error> {
        let unused = Deserializer::new(self.initialisms).parse(vars, params)?;
        if !unused.is_empty() {
            let keys: Vec<String> = unused.into_keys().collect();
            if self.settings.strict {
                return Err(Error::Unused(keys));
            }
            tracing::warn!("ignoring unrecognized parameters: {}", keys.join(", "));
        }
        let args = Serializer::new(self.initialisms).serialize(params)?;
        Ok(Invocation::new(program, args))
    }

    /// Fill `params` from `vars`, then run `program` with the resulting
    /// arguments.
    ///
    /// # Errors
    ///
    /// Everything [`prepare`](Self::prepare) returns, plus [`Error::Launch`]
    /// when the program cannot be started.
    pub fn exec(
        &self,
        program: &str,
        vars: &Vars,
        params: &mut dyn Record,
    ) -> Result<Outcome, Error> {
        let invocation = self.prepare(program, vars, params)?;
        self.launch(invocation)
    }

    /// Pick the parameter record for the command named in `vars`, then
    /// [`exec`](Self::exec) it.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownCommand`] when `S` has no record for the command key,
    /// plus everything [`exec`](Self::exec) returns.
    pub fn exec_command<S: CommandSet>(
        &self,
        program: &str,
        vars: &Vars,
    ) -> Result<Outcome, Error> {
        let mut command = Command::default();
        Deserializer::new(self.initialisms).parse(vars, &mut command)?;
        let key = command.key();

        let mut params = S::select(&key).ok_or_else(|| Error::UnknownCommand(key.clone()))?;
        tracing::debug!(
            "command '{key}' uses {} parameters",
            params.record().type_name()
        );
        self.exec(program, vars, params.record_mut())
    }

    fn launch(&self, invocation: Invocation) -> Result<Outcome, Error> {
        if self.settings.dry_run {
            tracing::info!(target: DRY_RUN_TARGET, "Would run: {invocation}");
            return Ok(Outcome {
                invocation,
                completion: Completion::DryRun,
            });
        }

        let code = self
            .launcher
            .launch(&invocation)
            .map_err(|source| Error::Launch {
                program: invocation.program.clone(),
                source,
            })?;
        let completion = code.map_or(Completion::Signalled, Completion::Exited);
        Ok(Outcome {
            invocation,
            completion,
        })
    }
}
