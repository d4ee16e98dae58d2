//! Pure text rewriting for the prompt script.
//!
//! Nothing in here touches the filesystem; [`crate::script`] owns the
//! read/compare/write boundary.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

use crate::color::AccentColor;

static USER_CONFIG_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(local\s+user_config_file\s*=\s*")[^"]*(")"#)
        .expect("user_config_file pattern is valid")
});

static SYS_CONFIG_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(local\s+sys_config_file\s*=\s*")[^"]*(")"#)
        .expect("sys_config_file pattern is valid")
});

/// What the script should point at after a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteTarget {
    /// Point both assignments at the per-color config file.
    Apply(AccentColor),
    /// Put the stock synth-shell paths back.
    Restore,
}

/// Where per-color configs live and what the stock defaults look like.
#[derive(Debug, Clone)]
pub struct PatchLayout {
    pub config_dir: PathBuf,
    pub config_prefix: String,
    pub default_user_config: String,
    pub default_sys_config: String,
    pub default_config_name: String,
    tagged_name: Regex,
}

impl PatchLayout {
    pub fn new(
        config_dir: PathBuf,
        config_prefix: impl Into<String>,
        default_user_config: impl Into<String>,
        default_sys_config: impl Into<String>,
        default_config_name: impl Into<String>,
    ) -> Self {
        let config_prefix = config_prefix.into();
        let pattern = format!(r"{}\.[a-zA-Z0-9_-]+\.config", regex::escape(&config_prefix));
        // An escaped literal followed by a fixed suffix always compiles.
        let tagged_name = Regex::new(&pattern).expect("escaped prefix pattern is valid");
        Self {
            config_dir,
            config_prefix,
            default_user_config: default_user_config.into(),
            default_sys_config: default_sys_config.into(),
            default_config_name: default_config_name.into(),
            tagged_name,
        }
    }

    /// File name of the config variant for `color`, e.g. `<prefix>.teal.config`.
    pub fn color_file_name(&self, color: AccentColor) -> String {
        format!("{}.{}.config", self.config_prefix, color)
    }

    /// Full path written into the script for `color`. Never created on disk.
    pub fn color_config_path(&self, color: AccentColor) -> String {
        self.config_dir
            .join(self.color_file_name(color))
            .to_string_lossy()
            .into_owned()
    }
}

/// Rewrite `text` so that it references `target`.
///
/// Only the first `user_config_file` and `sys_config_file` assignments are
/// touched; every `<prefix>.<tag>.config` occurrence is replaced.
pub fn rewrite(text: &str, target: RewriteTarget, layout: &PatchLayout) -> String {
    let (user_path, sys_path, file_name) = match target {
        RewriteTarget::Apply(color) => {
            let path = layout.color_config_path(color);
            (path.clone(), path, layout.color_file_name(color))
        }
        RewriteTarget::Restore => (
            layout.default_user_config.clone(),
            layout.default_sys_config.clone(),
            layout.default_config_name.clone(),
        ),
    };

    let text = replace_quoted_value(&USER_CONFIG_ASSIGNMENT, text, &user_path);
    let text = replace_quoted_value(&SYS_CONFIG_ASSIGNMENT, &text, &sys_path);
    layout
        .tagged_name
        .replace_all(&text, NoExpand(&file_name))
        .into_owned()
}

fn replace_quoted_value(pattern: &Regex, text: &str, value: &str) -> String {
    pattern
        .replace(text, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], value, &caps[2])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"#!/bin/bash
synth_shell_prompt()
{
	local user_config_file="$HOME/.config/synth-shell/synth-shell-prompt.config"
	local sys_config_file="/etc/synth-shell/synth-shell-prompt.config"
	if [ -f $user_config_file ]; then
		source $user_config_file
	fi
}
"#;

    fn layout() -> PatchLayout {
        PatchLayout::new(
            PathBuf::from("/opt/accent-sync"),
            "auto-synthshell-colors-prompt",
            "$HOME/.config/synth-shell/synth-shell-prompt.config",
            "/etc/synth-shell/synth-shell-prompt.config",
            "synth-shell-prompt.config",
        )
    }

    fn assignment<'a>(text: &'a str, name: &str) -> &'a str {
        text.lines()
            .find(|line| line.contains(name))
            .map(str::trim)
            .unwrap()
    }

    #[test]
    fn apply_points_both_assignments_at_color_config() {
        let out = rewrite(SCRIPT, RewriteTarget::Apply(AccentColor::Red), &layout());
        assert_eq!(
            assignment(&out, "local user_config_file"),
            r#"local user_config_file="/opt/accent-sync/auto-synthshell-colors-prompt.red.config""#
        );
        assert_eq!(
            assignment(&out, "local sys_config_file"),
            r#"local sys_config_file="/opt/accent-sync/auto-synthshell-colors-prompt.red.config""#
        );
        assert!(out.contains("source $user_config_file"));
    }

    #[test]
    fn apply_is_idempotent() {
        let once = rewrite(SCRIPT, RewriteTarget::Apply(AccentColor::Teal), &layout());
        let twice = rewrite(&once, RewriteTarget::Apply(AccentColor::Teal), &layout());
        assert_eq!(once, twice);
    }

    #[test]
    fn switching_colors_replaces_every_tagged_name() {
        let text = "local user_config_file=\"x\"\n# see auto-synthshell-colors-prompt.blue.config\n# and auto-synthshell-colors-prompt.my_theme-2.config\n";
        let out = rewrite(text, RewriteTarget::Apply(AccentColor::Pink), &layout());
        assert_eq!(out.matches("auto-synthshell-colors-prompt.pink.config").count(), 3);
        assert!(!out.contains(".blue."));
        assert!(!out.contains("my_theme-2"));
    }

    #[test]
    fn restore_after_many_changes_yields_stock_defaults() {
        let mut text = SCRIPT.to_string();
        for color in [AccentColor::Red, AccentColor::Blue, AccentColor::Purple] {
            text = rewrite(&text, RewriteTarget::Apply(color), &layout());
        }
        let restored = rewrite(&text, RewriteTarget::Restore, &layout());
        assert_eq!(restored, SCRIPT);
    }

    #[test]
    fn restore_inserts_dollar_home_literally() {
        let text = "local user_config_file=\"/somewhere\"\n";
        let out = rewrite(text, RewriteTarget::Restore, &layout());
        assert_eq!(
            out,
            "local user_config_file=\"$HOME/.config/synth-shell/synth-shell-prompt.config\"\n"
        );
    }

    #[test]
    fn restore_maps_tagged_names_to_default_name() {
        let text = "cp auto-synthshell-colors-prompt.green.config ~/\n";
        let out = rewrite(text, RewriteTarget::Restore, &layout());
        assert_eq!(out, "cp synth-shell-prompt.config ~/\n");
    }

    #[test]
    fn whitespace_around_assignment_is_tolerated() {
        let text = "local   sys_config_file =  \"/etc/x\"\n";
        let out = rewrite(text, RewriteTarget::Apply(AccentColor::Yellow), &layout());
        assert_eq!(
            out,
            "local   sys_config_file =  \"/opt/accent-sync/auto-synthshell-colors-prompt.yellow.config\"\n"
        );
    }

    #[test]
    fn only_first_assignment_is_rewritten() {
        let text = "local user_config_file=\"a\"\nlocal user_config_file=\"b\"\n";
        let out = rewrite(text, RewriteTarget::Restore, &layout());
        assert!(out.ends_with("local user_config_file=\"b\"\n"), "got: {out}");
    }

    #[test]
    fn text_without_targets_is_untouched() {
        let text = "echo hello\n";
        assert_eq!(rewrite(text, RewriteTarget::Apply(AccentColor::Red), &layout()), text);
        assert_eq!(rewrite(text, RewriteTarget::Restore, &layout()), text);
    }

    #[test]
    fn prefix_is_matched_literally() {
        let layout = PatchLayout::new(
            PathBuf::from("/d"),
            "a.b",
            "u",
            "s",
            "n.config",
        );
        let out = rewrite("axb.red.config a.b.red.config", RewriteTarget::Restore, &layout);
        assert_eq!(out, "axb.red.config n.config");
    }
}
