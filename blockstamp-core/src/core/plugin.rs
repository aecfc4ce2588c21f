//! Plugin entry points: manual commands and block-saved handling.
//!
//! Each entry point runs one read-decide-write cycle per block against the
//! [`Host`], in order. A host failure aborts the remaining blocks of that call;
//! blocks already written stay written.

use crate::core::rewriter::rewrite;
use crate::core::time_format::{Clock, SystemClock};
use crate::{
    BlockstampError, ChangeEvent, ChangeKind, Host, PluginSettings, PropertyValue, Result,
    TEMPLATE_PROPERTY,
};

/// Actions the host can trigger on the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Stamp the selection (or the block being edited), replacing old stamps.
    InsertTimestamp,
    /// Flag the block being edited as a template for its future children.
    MakeTemplate,
}

/// How a command is exposed in the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Listed in the slash-command menu.
    SlashCommand,
    /// Bound to a keyboard shortcut.
    Shortcut(String),
}

/// A command the host should register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub command: Command,
    pub label: &'static str,
    pub trigger: Trigger,
}

/// Stamps blocks through a [`Host`], rendering "now" with a [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct TimestampPlugin<C: Clock = SystemClock> {
    clock: C,
}

impl TimestampPlugin<SystemClock> {
    /// A plugin using the local wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> TimestampPlugin<C> {
    /// A plugin using `clock` for the rendered "now".
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// The commands to register with the host for `settings`.
    #[must_use]
    pub fn commands(settings: &PluginSettings) -> Vec<CommandDescriptor> {
        vec![
            CommandDescriptor {
                command: Command::InsertTimestamp,
                label: "Insert timestamp",
                trigger: Trigger::SlashCommand,
            },
            CommandDescriptor {
                command: Command::MakeTemplate,
                label: "Make timestamp template",
                trigger: Trigger::SlashCommand,
            },
            CommandDescriptor {
                command: Command::InsertTimestamp,
                label: "Insert timestamp",
                trigger: Trigger::Shortcut(settings.keybinding.clone()),
            },
        ]
    }

    /// Runs `command`. Returns the number of blocks changed.
    ///
    /// # Errors
    ///
    /// See [`insert_timestamp`](Self::insert_timestamp) and
    /// [`mark_template`](Self::mark_template).
    pub fn run_command<H: Host + ?Sized>(&self, host: &mut H, command: Command) -> Result<usize> {
        match command {
            Command::InsertTimestamp => self.insert_timestamp(host),
            Command::MakeTemplate => Ok(usize::from(self.mark_template(host)?)),
        }
    }

    /// Stamps every selected block, or the block being edited when nothing is
    /// selected, replacing any existing stamp. Returns the number of blocks
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::SettingsUnavailable`] before touching any
    /// block if the host has no settings, and propagates the first host error.
    pub fn insert_timestamp<H: Host + ?Sized>(&self, host: &mut H) -> Result<usize> {
        let settings = host.settings().ok_or(BlockstampError::SettingsUnavailable)?;
        let format = settings.effective_format();

        let targets: Vec<String> = match host.selected_blocks()? {
            Some(selected) if !selected.is_empty() => {
                selected.into_iter().map(|b| b.id).collect()
            }
            _ => host.editing_block()?.map(|b| b.id).into_iter().collect(),
        };
        if targets.is_empty() {
            log::debug!("insert timestamp: no selection and no block in edit");
        }

        let mut written = 0;
        for block_id in &targets {
            if self.stamp_with_format(host, block_id, format, true)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Marks the block being edited as a template. Returns `false` when no
    /// block is being edited.
    ///
    /// # Errors
    ///
    /// Propagates host errors.
    pub fn mark_template<H: Host + ?Sized>(&self, host: &mut H) -> Result<bool> {
        let Some(block) = host.editing_block()? else {
            return Ok(false);
        };
        host.set_block_property(&block.id, TEMPLATE_PROPERTY, PropertyValue::Boolean(true))?;
        log::info!("block {} marked as timestamp template", block.id);
        Ok(true)
    }

    /// Handles one change notification. Only [`ChangeKind::BlockSaved`] is
    /// acted on, and only its first block: if that block sits under a
    /// template, it is stamped unless it already carries a stamp.
    ///
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::SettingsUnavailable`] if a stamp is due but
    /// the host has no settings, and propagates host errors.
    pub fn handle_event<H: Host + ?Sized>(&self, host: &mut H, event: &ChangeEvent) -> Result<bool> {
        if event.kind != ChangeKind::BlockSaved {
            return Ok(false);
        }
        let Some(saved) = event.first_block() else {
            return Ok(false);
        };

        // The payload may be stale; the parent link and content are re-read.
        let Some(block) = host.get_block(&saved.id)? else {
            log::debug!("saved block {} is gone, skipping", saved.id);
            return Ok(false);
        };
        let Some(parent_id) = block.parent_id.as_deref() else {
            return Ok(false);
        };
        let is_template_child = host
            .get_block(parent_id)?
            .is_some_and(|parent| parent.is_template());
        if !is_template_child {
            return Ok(false);
        }

        let settings = host.settings().ok_or(BlockstampError::SettingsUnavailable)?;
        self.stamp_with_format(host, &block.id, settings.effective_format(), false)
    }

    /// Feeds `events` through [`handle_event`](Self::handle_event) in order.
    /// Returns the number of blocks written.
    ///
    /// # Errors
    ///
    /// Stops at the first error; earlier writes are kept.
    pub fn drain<H, I>(&self, host: &mut H, events: I) -> Result<usize>
    where
        H: Host + ?Sized,
        I: IntoIterator<Item = ChangeEvent>,
    {
        let mut written = 0;
        for event in events {
            if self.handle_event(host, &event)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Runs the stamping rule on one block and writes the result back.
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns [`BlockstampError::SettingsUnavailable`] if the host has no
    /// settings, [`BlockstampError::BlockNotFound`] if `block_id` does not
    /// resolve, and propagates host write errors.
    pub fn stamp_block<H: Host + ?Sized>(
        &self,
        host: &mut H,
        block_id: &str,
        force: bool,
    ) -> Result<bool> {
        let settings = host.settings().ok_or(BlockstampError::SettingsUnavailable)?;
        self.stamp_with_format(host, block_id, settings.effective_format(), force)
    }

    fn stamp_with_format<H: Host + ?Sized>(
        &self,
        host: &mut H,
        block_id: &str,
        format: &str,
        force: bool,
    ) -> Result<bool> {
        let block = host
            .get_block(block_id)?
            .ok_or_else(|| BlockstampError::BlockNotFound(block_id.to_string()))?;

        let now = self.clock.now_rendered(format);
        match rewrite(&block.content, format, &now, force) {
            Some(content) => {
                host.update_block(block_id, &content)?;
                log::info!("stamped block {block_id} with {now}");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
