//! Built-in command rules, in evaluation order.

use capguard_core::classification::{CapabilityFlags, RiskLevel};
use regex::Regex;
use std::sync::LazyLock;

/// A compiled built-in rule.
pub struct BuiltinRule {
    pub name: &'static str,
    pub regex: &'static LazyLock<Option<Regex>>,
    pub risk: RiskLevel,
    pub capabilities: CapabilityFlags,
}

macro_rules! command_rule {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Destructive ────────────────────────────────────────────────────────────
command_rule!(
    RE_DESTRUCTIVE,
    r"^(?:sudo\s+)?(?:rm|shred|dd|wipefs|mkfs(?:\.\w+)?)(?:\s|$)"
);

// ── Privilege ──────────────────────────────────────────────────────────────
command_rule!(RE_PRIVILEGE, r"^(?:sudo|su|doas|pkexec)(?:\s|$)");

// ── Permissions ────────────────────────────────────────────────────────────
command_rule!(RE_PERMISSIONS, r"^(?:chmod|chown|chgrp)(?:\s|$)");

// ── Network ────────────────────────────────────────────────────────────────
command_rule!(
    RE_NETWORK,
    r"^(?:curl|wget|ssh|scp|sftp|rsync|nc|ncat|telnet)(?:\s|$)"
);

// ── Read-only ──────────────────────────────────────────────────────────────
command_rule!(
    RE_READ_ONLY,
    r"^(?:cat|ls|echo|head|tail|grep|pwd|wc|less|stat|whoami)(?:\s|$)"
);

pub fn all_rules() -> Vec<BuiltinRule> {
    vec![
        BuiltinRule {
            name: "destructive",
            regex: &RE_DESTRUCTIVE,
            risk: RiskLevel::Severe,
            capabilities: CapabilityFlags::DESTRUCTIVE
                .union(CapabilityFlags::FILE_DELETION)
                .union(CapabilityFlags::IRREVERSIBLE),
        },
        BuiltinRule {
            name: "privilege",
            regex: &RE_PRIVILEGE,
            risk: RiskLevel::High,
            capabilities: CapabilityFlags::REQUIRES_ELEVATED_PRIVILEGE
                .union(CapabilityFlags::PRIVILEGE_ESCALATION),
        },
        BuiltinRule {
            name: "permissions",
            regex: &RE_PERMISSIONS,
            risk: RiskLevel::High,
            capabilities: CapabilityFlags::FILE_MODIFICATION
                .union(CapabilityFlags::SYSTEM_MODIFICATION),
        },
        BuiltinRule {
            name: "network",
            regex: &RE_NETWORK,
            risk: RiskLevel::Moderate,
            capabilities: CapabilityFlags::NETWORK_ACCESS,
        },
        BuiltinRule {
            name: "read_only",
            regex: &RE_READ_ONLY,
            risk: RiskLevel::Benign,
            capabilities: CapabilityFlags::empty(),
        },
    ]
}
