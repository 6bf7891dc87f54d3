//! 채팅 명령어 테이블.
//!
//! 명령어는 봇 멘션으로 시작하는 고정 문자열입니다 (예: `<@U123> price`).
//! 봇의 ID는 인증 후에야 알 수 있으므로 원본 키는 `__slack__` 플레이스홀더를
//! 담고 있고, `CommandTable::resolve`가 이를 실제 멘션 구문으로 치환합니다.

use std::collections::HashMap;

use crate::transport::SelfIdentity;

/// 원본 명령어 키에 들어가는 플레이스홀더.
pub const PLACEHOLDER: &str = "__slack__";

/// 명령어 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// 최근 조언
    Advice,
    /// 최근 가격
    Price,
    /// 후원 주소
    Donate,
    /// 명대사 한 줄
    RealAdvice,
    /// 도움말
    Help,
}

impl CommandKind {
    /// 테이블 순서대로 나열한 전체 명령어.
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Advice,
        CommandKind::Price,
        CommandKind::Donate,
        CommandKind::RealAdvice,
        CommandKind::Help,
    ];

    /// 멘션 뒤에 오는 명령어 단어.
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandKind::Advice => "advice",
            CommandKind::Price => "price",
            CommandKind::Donate => "donate",
            CommandKind::RealAdvice => "real advice",
            CommandKind::Help => "help",
        }
    }

    /// 플레이스홀더가 들어간 원본 명령어 키.
    pub fn raw(&self) -> String {
        format!("{} {}", PLACEHOLDER, self.keyword())
    }
}

/// 명령어 텍스트 → 명령어 종류 매핑.
#[derive(Debug, Clone)]
pub struct CommandTable {
    raw: Vec<(String, CommandKind)>,
    resolved: HashMap<String, CommandKind>,
}

impl CommandTable {
    /// 원본 키만 가진 (아직 디스패치할 수 없는) 테이블을 생성합니다.
    pub fn new() -> Self {
        Self {
            raw: CommandKind::ALL.iter().map(|kind| (kind.raw(), *kind)).collect(),
            resolved: HashMap::new(),
        }
    }

    /// 원본 명령어 키 목록 (테이블 순서).
    pub fn raw_commands(&self) -> impl Iterator<Item = &str> {
        self.raw.iter().map(|(key, _)| key.as_str())
    }

    /// 봇 식별 정보로 디스패치 키를 만듭니다.
    ///
    /// 각 원본 키의 첫 번째 플레이스홀더만 `<@ID>`로 바뀝니다.
    pub fn resolve(&mut self, identity: &SelfIdentity) {
        let mention = identity.mention();
        self.resolved = self
            .raw
            .iter()
            .map(|(key, kind)| (key.replacen(PLACEHOLDER, &mention, 1), *kind))
            .collect();
    }

    /// 디스패치 가능 여부.
    pub fn is_ready(&self) -> bool {
        !self.resolved.is_empty()
    }

    /// 텍스트와 정확히 일치하는 명령어를 찾습니다.
    pub fn lookup(&self, text: &str) -> Option<CommandKind> {
        self.resolved.get(text).copied()
    }

    /// 디스패치 키 목록.
    pub fn dispatch_keys(&self) -> impl Iterator<Item = &str> {
        self.resolved.keys().map(String::as_str)
    }

    /// 도움말 문장을 만듭니다.
    ///
    /// 예: `possible commands are: @gekko advice, @gekko price, ..., @gekko help.`
    pub fn help_text(&self, identity: &SelfIdentity) -> String {
        let mention = identity.display_mention();
        let commands: Vec<String> = self
            .raw_commands()
            .map(|command| command.replacen(PLACEHOLDER, &mention, 1))
            .collect();

        format!("possible commands are: {}.", commands.join(", "))
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_raw_commands_in_order() {
        let table = CommandTable::new();
        let raw: Vec<&str> = table.raw_commands().collect();
        assert_eq!(
            raw,
            vec![
                "__slack__ advice",
                "__slack__ price",
                "__slack__ donate",
                "__slack__ real advice",
                "__slack__ help",
            ]
        );
    }

    #[test]
    fn test_not_ready_before_resolve() {
        let table = CommandTable::new();
        assert!(!table.is_ready());
        assert_eq!(table.lookup("__slack__ price"), None);
    }

    #[test]
    fn test_resolve_and_lookup() {
        let mut table = CommandTable::new();
        table.resolve(&SelfIdentity::new("U1", "gekko"));

        assert!(table.is_ready());
        assert_eq!(table.lookup("<@U1> price"), Some(CommandKind::Price));
        assert_eq!(table.lookup("<@U1> real advice"), Some(CommandKind::RealAdvice));
        assert_eq!(table.lookup("<@U1> advice"), Some(CommandKind::Advice));
        assert_eq!(table.lookup("<@U1> Price"), None);
        assert_eq!(table.lookup("<@U1> price "), None);
        assert_eq!(table.lookup("__slack__ price"), None);
    }

    #[test]
    fn test_resolve_twice_uses_raw_keys() {
        let mut table = CommandTable::new();
        table.resolve(&SelfIdentity::new("U1", "gekko"));
        table.resolve(&SelfIdentity::new("U2", "gekko"));

        assert_eq!(table.lookup("<@U1> help"), None);
        assert_eq!(table.lookup("<@U2> help"), Some(CommandKind::Help));
        assert_eq!(table.dispatch_keys().count(), 5);
    }

    #[test]
    fn test_help_text() {
        let table = CommandTable::new();
        let help = table.help_text(&SelfIdentity::new("U1", "gekko"));

        assert_eq!(
            help,
            "possible commands are: @gekko advice, @gekko price, @gekko donate, \
             @gekko real advice, @gekko help."
        );
    }

    proptest! {
        #[test]
        fn prop_placeholder_replaced_once(id in "\\PC{1,24}") {
            let mut table = CommandTable::new();
            let identity = SelfIdentity::new(id.clone(), "bot");
            table.resolve(&identity);

            let mut expected: Vec<String> = CommandKind::ALL
                .iter()
                .map(|kind| format!("<@{}> {}", id, kind.keyword()))
                .collect();
            let mut keys: Vec<String> = table.dispatch_keys().map(str::to_string).collect();
            expected.sort();
            keys.sort();

            prop_assert_eq!(keys, expected);
        }
    }
}
