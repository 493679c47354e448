//! Prompt composition for the command generator.
//!
//! The composed prompt is always: one system turn carrying the shared rules
//! plus the brand template, the most recent context turns, and the current
//! request as the final user turn. Composition is pure; it never touches the
//! session it reads from.

use switchbot_core::brand::Brand;
use switchbot_core::message::Turn;

/// Default number of prior turns forwarded to the generator.
pub const DEFAULT_CONTEXT_WINDOW: usize = 12;

const BASE_RULES: &str = "\
You are a network expert specialized in switch configuration.

ABSOLUTE RULES:
1. Generate ONLY numbered CLI commands
2. NO explanatory text, NO description
3. NO 'show' command unless explicitly requested
4. NO IP address unless explicitly requested
5. Format: 1. command, 2. command, etc.
";

const CISCO_TEMPLATE: &str = "
CISCO IOS - MANDATORY STRUCTURE:
1. enable
2. configure terminal
3. [configuration commands]
X. end
Y. write memory

CISCO SYNTAX:
- Create VLAN: vlan X → name VLAN_X → exit
- Access port: interface TYPE X/Y → switchport mode access → switchport access vlan X → exit
- Trunk port: interface TYPE X/Y → switchport mode trunk → switchport trunk allowed vlan X,Y,Z → exit

EXAMPLE (create vlan 10 with port fastEthernet 0/1):
1. enable
2. configure terminal
3. vlan 10
4. name VLAN_10
5. exit
6. interface fastEthernet 0/1
7. switchport mode access
8. switchport access vlan 10
9. exit
10. end
11. write memory
";

const JUNIPER_TEMPLATE: &str = "
JUNIPER JunOS - MANDATORY STRUCTURE:
1. configure
2. [set commands]
X. commit

JUNOS SYNTAX:
- Create VLAN: set vlans VLAN_X vlan-id X
- Access port: set interfaces ge-X/X/X unit 0 family ethernet-switching vlan members VLAN_X

EXAMPLE (create vlan 10 with port ge-0/0/1):
1. configure
2. set vlans VLAN_10 vlan-id 10
3. set interfaces ge-0/0/1 unit 0 family ethernet-switching vlan members VLAN_10
4. commit
";

const HPE_TEMPLATE: &str = "
HPE/ARUBA - MANDATORY STRUCTURE:
1. configure terminal
2. [configuration commands]
X. write memory
Y. exit

HPE SYNTAX:
- Create VLAN: vlan X → name VLAN_X → exit
- Access port: interface X → vlan access X → exit

EXAMPLE (create vlan 10 with port 1):
1. configure terminal
2. vlan 10
3. name VLAN_10
4. exit
5. interface 1
6. vlan access 10
7. exit
8. write memory
9. exit
";

/// The full system instructions for `brand`.
pub fn system_prompt(brand: Brand) -> String {
    let template = match brand {
        Brand::Cisco => CISCO_TEMPLATE,
        Brand::Juniper => JUNIPER_TEMPLATE,
        Brand::Hpe => HPE_TEMPLATE,
    };
    format!("{BASE_RULES}{template}")
}

/// The final user turn: the request plus a brand-specific reminder.
pub fn request_turn(brand: Brand, query: &str) -> Turn {
    Turn::user(format!(
        "{query}\n\nGenerate ONLY the numbered CLI commands for {brand}."
    ))
}

/// Builds generator prompts from a brand, a request and session context.
#[derive(Debug, Clone, Copy)]
pub struct PromptComposer {
    context_window: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_WINDOW)
    }
}

impl PromptComposer {
    pub fn new(context_window: usize) -> Self {
        Self { context_window }
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    /// Compose the message sequence for one generator call.
    ///
    /// `history` is the session's retained turns, oldest first. Only the
    /// last `context_window` of them are forwarded.
    pub fn compose(&self, brand: Brand, query: &str, history: &[Turn]) -> Vec<Turn> {
        let start = history.len().saturating_sub(self.context_window);
        let context = &history[start..];

        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(Turn::system(system_prompt(brand)));
        messages.extend(context.iter().cloned());
        messages.push(request_turn(brand, query));
        messages
    }
}
