//! Reply text for every command outcome

use chrono::{DateTime, Local, Utc};

use crate::domain::entities::{CommandKind, Event, GroupCount, Member, Registration, UpsertOutcome};

pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Type !help to see what I can do.";
pub const NOT_REGISTERED: &str = "❌ You are not registered! Use !register to sign up.";
pub const NO_EVENTS: &str = "📅 No upcoming events right now. Ask an admin to create one!";
pub const NO_MEMBERS: &str = "👥 No registered members yet.";

/// Calendar date shown to members
pub fn local_date(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn local_datetime(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn permission_denied(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Announce => "❌ Only an admin can make announcements!",
        CommandKind::Event => "❌ Only an admin can create events!",
        _ => "❌ Admin access required!",
    }
}

pub fn usage(kind: CommandKind) -> String {
    match kind {
        CommandKind::Register => "🎵 *Member Registration* 🎵

Please send your details in this format:
!register [name] [favourite_genre] [role]

Example: !register Kamal Rock Guitarist

*Roles can be:*
Singer, Guitarist, Bassist, Drummer, Pianist, Producer, DJ, Listener, and so on"
            .to_string(),
        CommandKind::Announce => "❌ Please provide the announcement message.".to_string(),
        CommandKind::Event => "🎵 *Create an Event* 🎵

Format: !event create [date] [time] [event_name]
Example: !event create 2024-12-25 19:00 Christmas_Concert"
            .to_string(),
        other => format!("Usage: !{} {}", other.name(), other.usage().unwrap_or("")).trim_end().to_string(),
    }
}

/// Generic per-command failure text after a storage or transport error
pub fn failure(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::Register => "❌ Something went wrong during registration. Please try again.",
        CommandKind::Profile => "❌ Could not load your profile.",
        CommandKind::Events => "❌ Could not load events.",
        CommandKind::Stats => "❌ Could not load statistics.",
        CommandKind::Members => "❌ Could not load the members list.",
        CommandKind::Event => "❌ Could not create the event.",
        CommandKind::Backup => "❌ Could not create the backup.",
        _ => "❌ Something went wrong. Please try again.",
    }
}

pub fn help(bot_name: &str) -> String {
    let mut member = String::new();
    let mut admin = String::new();
    for kind in CommandKind::ALL {
        let line = match kind.usage() {
            Some(usage) => format!("!{} {} - {}\n", kind.name(), usage, kind.description()),
            None => format!("!{} - {}\n", kind.name(), kind.description()),
        };
        if kind.is_admin_only() {
            admin.push_str(&line);
        } else {
            member.push_str(&line);
        }
    }

    format!(
        "🎵 *{} Commands* 🎵

*👥 Member Commands:*
{}
*🎵 Music Features:*
!recommend sinhala - Sinhala music
!recommend baila - Baila music
!recommend rock - Rock music

*⚙️ Admin Commands:*
{}
🎶 Type a command to get started!",
        bot_name, member, admin
    )
}

pub fn registered(outcome: UpsertOutcome, registration: &Registration) -> String {
    match outcome {
        UpsertOutcome::Updated => format!(
            "🎵 *Profile Updated!* 🎵

{}, your profile has been updated!
🎶 Genre: {}
🎸 Role: {}",
            registration.name, registration.genre, registration.role
        ),
        UpsertOutcome::Created => format!(
            "🎵 *Registration Successful!* 🎵

Welcome {}!
🎶 Genre: {}
🎸 Role: {}

You are now a registered member! Type !profile to see your full profile.",
            registration.name, registration.genre, registration.role
        ),
    }
}

pub fn profile(member: &Member) -> String {
    format!(
        "🎵 *Your Music Club Profile* 🎵

👤 *Name:* {}
🎶 *Favourite Genre:* {}
🎸 *Role:* {}
📅 *Member Since:* {}
⭐ *Participation Score:* {}
🏆 *Level:* {}",
        member.name,
        member.genre,
        member.role,
        local_date(&member.join_date),
        member.participation_score,
        member.level()
    )
}

pub fn events(events: &[Event]) -> String {
    let mut list = String::from("🎵 *Upcoming Music Events* 🎵\n\n");
    for (index, event) in events.iter().enumerate() {
        list.push_str(&format!("{}. 🎤 *{}*\n", index + 1, event.name));
        list.push_str(&format!("   📅 {} | ⏰ {}\n", event.date, event.time));
        list.push_str(&format!("   👥 {} attending\n\n", event.attendees.len()));
    }
    list.trim_end().to_string()
}

pub fn recommendation(song: &str, genre_label: &str) -> String {
    format!(
        "🎵 *Music Recommendation* 🎵

🎶 *Today's Pick:* {}
🎯 *Genre:* {}

Give it a listen and share your thoughts! 🎧",
        song, genre_label
    )
}

pub struct StatsReport {
    pub total_members: u64,
    pub active_members: u64,
    pub total_events: u64,
    pub top_genres: Vec<GroupCount>,
    pub top_roles: Vec<GroupCount>,
}

pub fn stats(report: &StatsReport) -> String {
    let mut stats = String::from("📊 *Music Club Statistics* 📊\n\n");
    stats.push_str(&format!("👥 *Total Members:* {}\n", report.total_members));
    stats.push_str(&format!("✅ *Active Members:* {}\n", report.active_members));
    stats.push_str(&format!("🎤 *Total Events:* {}\n", report.total_events));

    if !report.top_genres.is_empty() {
        stats.push_str("\n🎶 *Top Genres:*\n");
        for (index, group) in report.top_genres.iter().enumerate() {
            stats.push_str(&format!("{}. {}: {} members\n", index + 1, group.key, group.count));
        }
    }

    if !report.top_roles.is_empty() {
        stats.push_str("\n🎸 *Popular Roles:*\n");
        for (index, group) in report.top_roles.iter().enumerate() {
            stats.push_str(&format!("{}. {}: {} members\n", index + 1, group.key, group.count));
        }
    }

    stats.trim_end().to_string()
}

/// Phone numbers are included only for admins
pub fn members(members: &[Member], show_phone: bool) -> String {
    let mut list = String::from("👥 *Registered Members* 👥\n\n");
    for (index, member) in members.iter().enumerate() {
        list.push_str(&format!("{}. 🎵 *{}*\n", index + 1, member.name));
        list.push_str(&format!("   🎶 {} | 🎸 {}\n", member.genre, member.role));
        if show_phone {
            list.push_str(&format!("   📱 {}\n", member.phone_number));
        }
        list.push_str(&format!("   📅 {}\n\n", local_date(&member.join_date)));
    }
    list.push_str(&format!("📊 *Total: {} members*", members.len()));
    list
}

pub fn announcement(text: &str, admin_phone: &str) -> String {
    format!(
        "📢 *MUSIC CLUB ANNOUNCEMENT* 📢

{}

🎵 *From: Music Club Management* 🎵

*Admin: +{}*",
        text, admin_phone
    )
}

pub fn event_created(event: &Event) -> String {
    format!(
        "🎵 *NEW EVENT CREATED* 🎵

🎤 *Event:* {}
📅 *Date:* {}
⏰ *Time:* {}

👍 React to confirm attendance!
❤️ React to show you're excited!

#MusicClubEvent #SaveTheDate",
        event.name, event.date, event.time
    )
}

pub fn backup_created(members: usize, events: usize, at: &DateTime<Utc>) -> String {
    format!(
        "💾 *Backup Created Successfully!* 💾

📊 *Backup Details:*
• Members: {}
• Events: {}
• Timestamp: {}",
        members,
        events,
        local_datetime(at)
    )
}

pub fn welcome(group_name: &str) -> String {
    format!(
        "🎵 *Welcome to {}!* 🎵

🎶 We're happy to have you in our music club!

*What we do:*
• Share and discover new music
• Organize listening parties and events
• Discuss music theory and techniques
• Support local artists

*Get started:*
• Type !register to complete your profile
• Type !help to see available commands
• Type !events to see upcoming activities

*Group Rules:*
✅ Be respectful and supportive
✅ Share music-related content
✅ No spam
✅ Keep discussions music focused

🎵 Let's make beautiful music together! 🎵",
        group_name
    )
}

pub const REGISTRATION_REMINDER: &str =
    "👋 Hi! Don't forget to use the !register command to get the full Music Club experience! 📱🎵";

pub fn started(bot_name: &str) -> String {
    format!("🎵 {} started successfully! Database ready. 🎵", bot_name)
}
