use std::collections::HashMap;

use capguard_core::classification::ClassifiedCommand;
use capguard_core::models::{FamilyInput, FamilyKind};

/// Command lines split into families and standalone commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandGroups {
    /// One entry per parent tool, in order of first appearance.
    pub families: Vec<FamilyInput>,
    /// Single-word commands, in input order.
    pub standalone: Vec<ClassifiedCommand>,
}

/// Group `"parent sub ..."` command lines by parent tool.
///
/// The name is split at its first whitespace character: everything after it
/// is the subcommand, with inner runs of whitespace collapsed. Single-word
/// commands stay standalone even when a family of the same name exists.
pub fn group_command_families(commands: &[ClassifiedCommand]) -> CommandGroups {
    let mut groups = CommandGroups::default();
    let mut by_parent: HashMap<&str, usize> = HashMap::new();

    for command in commands {
        let name = command.name.trim();
        match name.split_once(char::is_whitespace) {
            Some((parent, sub)) if !sub.trim().is_empty() => {
                let sub = sub.split_whitespace().collect::<Vec<_>>().join(" ");
                let index = *by_parent.entry(parent).or_insert_with(|| {
                    groups
                        .families
                        .push(FamilyInput::new(parent, infer_family_kind(parent)));
                    groups.families.len() - 1
                });
                groups.families[index]
                    .children
                    .push(ClassifiedCommand::new(sub, command.classification));
            }
            _ => groups.standalone.push(command.clone()),
        }
    }
    groups
}

/// Best-effort family kind for well-known parent tools.
pub fn infer_family_kind(parent: &str) -> FamilyKind {
    match parent {
        "git" | "hg" | "svn" | "fossil" => FamilyKind::VersionControl,
        "apt" | "apt-get" | "dnf" | "yum" | "pacman" | "brew" | "npm" | "pip" | "cargo" => {
            FamilyKind::PackageManager
        }
        "docker" | "podman" | "nerdctl" | "ctr" => FamilyKind::ContainerRuntime,
        "bcachefs" | "btrfs" | "zfs" | "zpool" | "lvm" | "mdadm" => FamilyKind::StorageManagement,
        "aws" | "gcloud" | "az" | "doctl" => FamilyKind::CloudCli,
        "mysql" | "psql" | "mongo" | "redis-cli" | "sqlite3" => FamilyKind::Database,
        _ => FamilyKind::Generic,
    }
}
