// CloudFormation intrinsic function names and their YAML short-form tags

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// Intrinsic functions that have a YAML short form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    Ref,
    Condition,
    And,
    Base64,
    Cidr,
    Contains,
    EachMemberEquals,
    EachMemberIn,
    Equals,
    FindInMap,
    GetAtt,
    GetAZs,
    If,
    ImportValue,
    Join,
    Length,
    Not,
    Or,
    RefAll,
    Select,
    Split,
    Sub,
    ToJsonString,
    Transform,
    ValueOf,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 25] = [
        Intrinsic::Ref,
        Intrinsic::Condition,
        Intrinsic::And,
        Intrinsic::Base64,
        Intrinsic::Cidr,
        Intrinsic::Contains,
        Intrinsic::EachMemberEquals,
        Intrinsic::EachMemberIn,
        Intrinsic::Equals,
        Intrinsic::FindInMap,
        Intrinsic::GetAtt,
        Intrinsic::GetAZs,
        Intrinsic::If,
        Intrinsic::ImportValue,
        Intrinsic::Join,
        Intrinsic::Length,
        Intrinsic::Not,
        Intrinsic::Or,
        Intrinsic::RefAll,
        Intrinsic::Select,
        Intrinsic::Split,
        Intrinsic::Sub,
        Intrinsic::ToJsonString,
        Intrinsic::Transform,
        Intrinsic::ValueOf,
    ];

    /// The tag name used in YAML, without the leading `!`.
    pub fn short_name(self) -> &'static str {
        match self {
            Intrinsic::Ref => "Ref",
            Intrinsic::Condition => "Condition",
            Intrinsic::And => "And",
            Intrinsic::Base64 => "Base64",
            Intrinsic::Cidr => "Cidr",
            Intrinsic::Contains => "Contains",
            Intrinsic::EachMemberEquals => "EachMemberEquals",
            Intrinsic::EachMemberIn => "EachMemberIn",
            Intrinsic::Equals => "Equals",
            Intrinsic::FindInMap => "FindInMap",
            Intrinsic::GetAtt => "GetAtt",
            Intrinsic::GetAZs => "GetAZs",
            Intrinsic::If => "If",
            Intrinsic::ImportValue => "ImportValue",
            Intrinsic::Join => "Join",
            Intrinsic::Length => "Length",
            Intrinsic::Not => "Not",
            Intrinsic::Or => "Or",
            Intrinsic::RefAll => "RefAll",
            Intrinsic::Select => "Select",
            Intrinsic::Split => "Split",
            Intrinsic::Sub => "Sub",
            Intrinsic::ToJsonString => "ToJsonString",
            Intrinsic::Transform => "Transform",
            Intrinsic::ValueOf => "ValueOf",
        }
    }

    /// The key used for the function in long-form (JSON) templates.
    pub fn long_name(self) -> &'static str {
        match self {
            Intrinsic::Ref => "Ref",
            Intrinsic::Condition => "Condition",
            Intrinsic::And => "Fn::And",
            Intrinsic::Base64 => "Fn::Base64",
            Intrinsic::Cidr => "Fn::Cidr",
            Intrinsic::Contains => "Fn::Contains",
            Intrinsic::EachMemberEquals => "Fn::EachMemberEquals",
            Intrinsic::EachMemberIn => "Fn::EachMemberIn",
            Intrinsic::Equals => "Fn::Equals",
            Intrinsic::FindInMap => "Fn::FindInMap",
            Intrinsic::GetAtt => "Fn::GetAtt",
            Intrinsic::GetAZs => "Fn::GetAZs",
            Intrinsic::If => "Fn::If",
            Intrinsic::ImportValue => "Fn::ImportValue",
            Intrinsic::Join => "Fn::Join",
            Intrinsic::Length => "Fn::Length",
            Intrinsic::Not => "Fn::Not",
            Intrinsic::Or => "Fn::Or",
            Intrinsic::RefAll => "Fn::RefAll",
            Intrinsic::Select => "Fn::Select",
            Intrinsic::Split => "Fn::Split",
            Intrinsic::Sub => "Fn::Sub",
            Intrinsic::ToJsonString => "Fn::ToJsonString",
            Intrinsic::Transform => "Fn::Transform",
            Intrinsic::ValueOf => "Fn::ValueOf",
        }
    }

    pub fn from_short_name(tag: &str) -> Option<Intrinsic> {
        SHORT_FORM_TO_INTRINSIC.get(tag).copied()
    }

    pub fn from_long_name(key: &str) -> Option<Intrinsic> {
        LONG_FORM_TO_INTRINSIC.get(key).copied()
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.short_name())
    }
}

lazy_static! {
    static ref SHORT_FORM_TO_INTRINSIC: HashMap<&'static str, Intrinsic> = Intrinsic::ALL
        .iter()
        .map(|i| (i.short_name(), *i))
        .collect();
    static ref LONG_FORM_TO_INTRINSIC: HashMap<&'static str, Intrinsic> = Intrinsic::ALL
        .iter()
        .map(|i| (i.long_name(), *i))
        .collect();
}
