//! Telegram Markdown rendering for registration and support messages.
//!
//! Every user-supplied value passes through [`escape_markdown`] before it is
//! interpolated, so form input cannot break out of the template formatting.

use crate::domain::{ContactTicket, RegistrationKind, RegistrationSubmission};

/// Escapes the characters that are significant in Telegram's legacy
/// Markdown parse mode.
pub fn escape_markdown(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Renders the notification caption for a registration, branching on kind.
pub fn registration_message(submission: &RegistrationSubmission) -> String {
    match submission.kind {
        RegistrationKind::Squad => squad_message(submission),
        RegistrationKind::Solo => solo_message(submission),
    }
}

fn solo_message(s: &RegistrationSubmission) -> String {
    format!(
        "👤 *NEW SOLO REGISTRATION*\n\
         \n\
         🕴️ *PLAYER INFO*\n\
         👤 Name: *{name}*\n\
         🎮 UID: `{uid}`\n\
         📧 Email: {email}\n\
         📞 Phone: `{phone}`\n\
         \n\
         💸 *PAYMENT*\n\
         Method: {method}\n",
        name = escape_markdown(&s.player_name),
        uid = escape_markdown(&s.primary_uid),
        email = escape_markdown(&s.email),
        phone = escape_markdown(&s.phone),
        method = escape_markdown(&s.payment_method),
    )
}

fn squad_message(s: &RegistrationSubmission) -> String {
    format!(
        "🚨 *NEW SQUAD REGISTRATION* 🚨\n\
         \n\
         👥 *LEADER INFO*\n\
         👤 Name: *{name}*\n\
         📧 Email: {email}\n\
         📞 Phone: `{phone}`\n\
         \n\
         ⚔️ *ROSTER (4 Players)*\n\
         1. `{leader}` (L)\n\
         2. `{t1}`\n\
         3. `{t2}`\n\
         4. `{t3}`\n\
         \n\
         💸 *PAYMENT*\n\
         Method: {method}\n",
        name = escape_markdown(&s.player_name),
        email = escape_markdown(&s.email),
        phone = escape_markdown(&s.phone),
        leader = escape_markdown(&s.primary_uid),
        t1 = escape_markdown(&s.teammate_uids[0]),
        t2 = escape_markdown(&s.teammate_uids[1]),
        t3 = escape_markdown(&s.teammate_uids[2]),
        method = escape_markdown(&s.payment_method),
    )
}

/// Renders a support ticket for the contact bot.
pub fn ticket_message(ticket: &ContactTicket) -> String {
    format!(
        "📬 *NEW SUPPORT TICKET*\n\
         \n\
         👤 *User:* {name}\n\
         📞 *Phone:* `{phone}`\n\
         🎮 *UID:* `{uid}`\n\
         \n\
         📝 *Message:*\n\
         {message}\n",
        name = escape_markdown(&ticket.name),
        phone = escape_markdown(&ticket.phone),
        uid = escape_markdown(&ticket.uid),
        message = escape_markdown(&ticket.message),
    )
}
