//! Command-line controller
//!
//! Parses a line with POSIX shell quoting, dispatches to a registered
//! command after checking its arity, and drives an editing session
//! (completion, submit, delete-at-start) against a [`CommandSurface`].
//!
//! Dispatch errors that are the user's fault (bad quoting, unknown command,
//! wrong argument count) end up on the status line. Errors returned by a
//! handler body are handed back to the caller.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::completion::{complete, Completion, CompletionCycle};
use crate::error::{CommandError, Result};

/// Default caption shown in front of the command line
pub const DEFAULT_CAPTION: &str = "> ";

/// Number of positional arguments a command accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range { min: usize, max: usize },
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, given: usize) -> bool {
        match *self {
            Arity::Exact(n) => given == n,
            Arity::Range { min, max } => (min..=max).contains(&given),
            Arity::AtLeast(min) => given >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Range { min, max } => write!(f, "{min}..={max}"),
            Arity::AtLeast(min) => write!(f, "{min}+"),
        }
    }
}

type Handler = Box<dyn FnMut(&[String]) -> anyhow::Result<()>>;

/// A callable with a declared arity
pub struct Command {
    arity: Arity,
    handler: Handler,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command").field("arity", &self.arity).finish()
    }
}

impl Command {
    pub fn new(
        arity: Arity,
        handler: impl FnMut(&[String]) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            arity,
            handler: Box::new(handler),
        }
    }

    /// Command taking no arguments
    pub fn nullary(mut f: impl FnMut() + 'static) -> Self {
        Self::new(Arity::Exact(0), move |_| {
            f();
            Ok(())
        })
    }

    /// Command taking exactly one argument
    pub fn unary(mut f: impl FnMut(&str) + 'static) -> Self {
        Self::new(Arity::Exact(1), move |args| {
            f(&args[0]);
            Ok(())
        })
    }

    /// Command taking exactly two arguments
    pub fn binary(mut f: impl FnMut(&str, &str) + 'static) -> Self {
        Self::new(Arity::Exact(2), move |args| {
            f(&args[0], &args[1]);
            Ok(())
        })
    }

    /// Command taking any number of arguments
    pub fn variadic(mut f: impl FnMut(&[String]) + 'static) -> Self {
        Self::new(Arity::AtLeast(0), move |args| {
            f(args);
            Ok(())
        })
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }
}

/// Name -> command table, fixed once handed to a controller
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn with(mut self, name: impl Into<String>, command: Command) -> Self {
        self.register(name, command);
        self
    }

    /// Register `command` under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, command: Command) {
        self.commands.insert(name.into(), command);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Check the arity at the call site, then run the handler.
    ///
    /// Only a mismatch detected here is `WrongArguments`; whatever the
    /// handler returns is wrapped in `Failed`.
    pub fn invoke(&mut self, name: &str, args: &[String]) -> Result<()> {
        let command = self
            .commands
            .get_mut(name)
            .ok_or_else(|| CommandError::not_found(name))?;
        if !command.arity.accepts(args.len()) {
            return Err(CommandError::wrong_arguments(name, command.arity, args.len()));
        }
        (command.handler)(args).map_err(|source| CommandError::failed(name, source))
    }
}

/// Split a line into tokens with shell quoting rules.
///
/// Blank input yields `Ok(None)`; unterminated quotes are `InvalidCommand`.
pub fn parse_line(line: &str) -> Result<Option<Vec<String>>> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let tokens = shlex::split(line).ok_or(CommandError::InvalidCommand)?;
    Ok((!tokens.is_empty()).then_some(tokens))
}

/// The command line and footer as seen by the controller
pub trait CommandSurface {
    fn caption(&self) -> &str;
    fn set_caption(&mut self, caption: &str);
    fn text(&self) -> &str;
    fn set_text(&mut self, text: &str);
    /// Cursor position in characters
    fn position(&self) -> usize;
    fn set_position(&mut self, position: usize);
    /// Show the command line in the footer and give it focus
    fn focus_prompt(&mut self);
    /// Clear caption and buffer, return focus to the body
    fn stop_editing(&mut self);
    /// Leave any prompt and return to the normal footer and focus
    fn escape(&mut self);
    /// Replace the footer with a status message
    fn change_status(&mut self, status: &str);
}

/// What the embedding text field should do with the key that fired a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The trigger handled the key; do not pass it on
    Consumed,
    /// Let the text field apply its own handling
    Forward,
}

type SubmitCallback = Box<dyn FnMut(&str) -> anyhow::Result<()>>;

/// Where a submitted line goes
#[derive(Default)]
pub enum Submit {
    /// Parse and dispatch through the registry
    #[default]
    Command,
    /// Hand the raw line to a custom callback
    Callback(SubmitCallback),
}

impl fmt::Debug for Submit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Submit::Command => f.write_str("Command"),
            Submit::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// Parameters for [`CommandController::start_editing`]
#[derive(Debug)]
pub struct EditOptions {
    pub caption: String,
    pub start_text: String,
    pub submit: Submit,
    pub vocabulary: Vec<String>,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            caption: DEFAULT_CAPTION.to_string(),
            start_text: String::new(),
            submit: Submit::Command,
            vocabulary: Vec::new(),
        }
    }
}

impl EditOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn start_text(mut self, text: impl Into<String>) -> Self {
        self.start_text = text.into();
        self
    }

    pub fn callback(mut self, f: impl FnMut(&str) -> anyhow::Result<()> + 'static) -> Self {
        self.submit = Submit::Callback(Box::new(f));
        self
    }

    pub fn vocabulary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = words.into_iter().map(Into::into).collect();
        self
    }
}

/// State of one command-line interaction
#[derive(Debug)]
pub struct EditSession {
    caption: String,
    vocabulary: Vec<String>,
    submit: Submit,
    cycle: Option<CompletionCycle>,
}

impl EditSession {
    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Candidates currently being cycled through
    pub fn cycling(&self) -> Option<&[String]> {
        self.cycle.as_ref().map(CompletionCycle::matches)
    }
}

/// Accept/reject pair produced by [`CommandController::are_you_sure`]
pub struct Confirmation {
    yes: Box<dyn FnMut()>,
    no: Box<dyn FnMut()>,
}

impl fmt::Debug for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Confirmation")
    }
}

impl Confirmation {
    /// Run the accept callback, then leave the prompt
    pub fn accept<S: CommandSurface + ?Sized>(&mut self, surface: &mut S) {
        (self.yes)();
        surface.escape();
    }

    /// Run the reject callback, then leave the prompt
    pub fn reject<S: CommandSurface + ?Sized>(&mut self, surface: &mut S) {
        (self.no)();
        surface.escape();
    }
}

/// Owns the command registry and the current editing session
#[derive(Debug, Default)]
pub struct CommandController {
    registry: CommandRegistry,
    session: Option<EditSession>,
}

impl CommandController {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            session: None,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// Parse and run `line`, without touching any surface
    pub fn dispatch(&mut self, line: &str) -> Result<()> {
        let Some(mut tokens) = parse_line(line)? else {
            return Ok(());
        };
        let name = tokens.remove(0);
        info!(command = %name, args = tokens.len(), "dispatching command");
        self.registry.invoke(&name, &tokens)
    }

    /// Default submit path: dispatch `line`, reporting status-class errors
    /// on the surface. Handler failures are returned.
    pub fn submit_command<S: CommandSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        line: &str,
    ) -> Result<()> {
        match self.dispatch(line) {
            Err(err) if err.is_status() => {
                warn!(error = ?err, "command rejected");
                surface.change_status(&err.to_string());
                Ok(())
            }
            other => other,
        }
    }

    /// Build the accept/reject pair for a yes/no prompt
    pub fn are_you_sure(
        &self,
        yes: impl FnMut() + 'static,
        no: impl FnMut() + 'static,
    ) -> Confirmation {
        Confirmation {
            yes: Box::new(yes),
            no: Box::new(no),
        }
    }

    /// Open an editing session on `surface`
    pub fn start_editing<S: CommandSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        options: EditOptions,
    ) {
        surface.set_caption(&options.caption);
        surface.set_text(&options.start_text);
        surface.set_position(options.start_text.chars().count());
        surface.focus_prompt();
        debug!(caption = %options.caption, submit = ?options.submit, "editing started");
        self.session = Some(EditSession {
            caption: options.caption,
            vocabulary: options.vocabulary,
            submit: options.submit,
            cycle: None,
        });
    }

    /// Close the session and clear the command line
    pub fn stop_editing<S: CommandSurface + ?Sized>(&mut self, surface: &mut S) {
        self.session = None;
        surface.stop_editing();
        debug!("editing stopped");
    }

    /// Preview the completion of the current buffer without applying it
    pub fn start_completion<S: CommandSurface + ?Sized>(&self, surface: &S) -> Option<Completion> {
        let session = self.session.as_ref()?;
        Some(complete(&session.vocabulary, surface.text()))
    }

    /// Apply the best extension, or cycle through the matches when the
    /// buffer still holds the previous completion.
    ///
    /// Returns whether a session was open.
    pub fn commit_completion<S: CommandSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let text = surface.text();
        let next = match session.cycle.as_mut() {
            Some(cycle) if cycle.is_current(text) => cycle.advance().to_string(),
            _ => {
                let completion = complete(&session.vocabulary, text);
                debug!(
                    prefix = %text,
                    extended = %completion.extended,
                    matches = completion.matches.len(),
                    "completion computed"
                );
                session.cycle = CompletionCycle::new(completion.extended.clone(), completion.matches);
                completion.extended
            }
        };
        surface.set_text(&next);
        surface.set_position(next.chars().count());
        true
    }

    /// Drop the completion cycle after an edit that was not a completion
    pub fn invalidate_completion(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cycle = None;
        }
    }

    /// Read the buffer, end the session, then run the session's submit path.
    ///
    /// Without an open session the line goes to the default path.
    pub fn submit<S: CommandSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let line = surface.text().to_string();
        let session = self.session.take();
        surface.stop_editing();
        match session.map(|session| session.submit) {
            Some(Submit::Callback(mut callback)) => callback(&line).map_err(CommandError::callback),
            _ => self.submit_command(surface, &line),
        }
    }

    /// Backspace at the start of the line: an empty buffer ends the session
    pub fn delete_at_start<S: CommandSurface + ?Sized>(&mut self, surface: &mut S) -> KeyDisposition {
        if surface.text().is_empty() {
            self.stop_editing(surface);
            KeyDisposition::Consumed
        } else {
            KeyDisposition::Forward
        }
    }
}
