//! Closed value sets carried in tags and commands.
//!
//! Every enumeration parses case-insensitively from its wire spelling and
//! renders back to the canonical spelling through `as_str`/`Display`.

use std::fmt;

/// Returned when a value is not one of an enumeration's wire spellings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Name of the enumeration.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} {:?}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[non_exhaustive]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Canonical wire spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// The `user-type` tag. Regular users send an empty value.
    pub enum UserType {
        Normal => "",
        Mod => "mod",
        Admin => "admin",
        GlobalMod => "global_mod",
        Staff => "staff",
    }
}

wire_enum! {
    /// The `msg-param-sub-plan` tag.
    pub enum SubPlan {
        Prime => "Prime",
        Tier1 => "1000",
        Tier2 => "2000",
        Tier3 => "3000",
    }
}

wire_enum! {
    /// The `msg-id` tag of NOTICE and USERNOTICE, and `source-msg-id` of
    /// shared chat notices.
    pub enum MessageId {
        // NOTICE
        EmoteOnlyOff => "emote_only_off",
        EmoteOnlyOn => "emote_only_on",
        FollowersOff => "followers_off",
        FollowersOn => "followers_on",
        FollowersOnZero => "followers_on_zero",
        MsgBanned => "msg_banned",
        MsgBadCharacters => "msg_bad_characters",
        MsgChannelBlocked => "msg_channel_blocked",
        MsgChannelSuspended => "msg_channel_suspended",
        MsgDuplicate => "msg_duplicate",
        MsgEmoteOnly => "msg_emoteonly",
        MsgFollowersOnly => "msg_followersonly",
        MsgFollowersOnlyFollowed => "msg_followersonly_followed",
        MsgFollowersOnlyZero => "msg_followersonly_zero",
        MsgR9k => "msg_r9k",
        MsgRateLimit => "msg_ratelimit",
        MsgRejected => "msg_rejected",
        MsgRejectedMandatory => "msg_rejected_mandatory",
        MsgRequiresVerifiedPhoneNumber => "msg_requires_verified_phone_number",
        MsgSlowMode => "msg_slowmode",
        MsgSubsOnly => "msg_subsonly",
        MsgSuspended => "msg_suspended",
        MsgTimedOut => "msg_timedout",
        MsgVerifiedEmail => "msg_verified_email",
        R9kOff => "r9k_off",
        R9kOn => "r9k_on",
        SlowOff => "slow_off",
        SlowOn => "slow_on",
        SubsOff => "subs_off",
        SubsOn => "subs_on",
        TosBan => "tos_ban",
        UnrecognizedCmd => "unrecognized_cmd",
        // USERNOTICE
        Sub => "sub",
        Resub => "resub",
        SubGift => "subgift",
        SubMysteryGift => "submysterygift",
        GiftPaidUpgrade => "giftpaidupgrade",
        RewardGift => "rewardgift",
        AnonGiftPaidUpgrade => "anongiftpaidupgrade",
        Raid => "raid",
        Unraid => "unraid",
        BitsBadgeTier => "bitsbadgetier",
        Announcement => "announcement",
        SharedChatNotice => "sharedchatnotice",
    }
}

wire_enum! {
    /// Twitch-specific commands, beyond the IRC core.
    pub enum TwitchCommand {
        ClearChat => "CLEARCHAT",
        ClearMsg => "CLEARMSG",
        GlobalUserState => "GLOBALUSERSTATE",
        HostTarget => "HOSTTARGET",
        Reconnect => "RECONNECT",
        RoomState => "ROOMSTATE",
        UserNotice => "USERNOTICE",
        UserState => "USERSTATE",
        Whisper => "WHISPER",
    }
}
