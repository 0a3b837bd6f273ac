//! Plain-text views

use eventhub_api::{Event, Remaining, Session};
use eventhub_core::{CountdownBoard, FormMode};
use eventhub_util::format_event_date;
use std::fmt::Write;

use crate::app::{App, Screen};

const RULE: &str = "────────────────────────────────────────";

/// Render the whole screen: navbar plus the current view
pub fn render(app: &App) -> String {
    let mut out = navbar(&app.session());
    out.push('\n');

    let body = match app.screen() {
        Screen::Loading => "Loading...\n".to_string(),
        Screen::Landing => landing(),
        Screen::Auth => auth(app.auth_mode(), app.auth_error()),
        Screen::Events(events) => events_list(events, app.board()),
        Screen::EventDetails(event) => event_details(event, app.board()),
        Screen::EventNotFound(_) => event_not_found(),
        Screen::Unavailable(message) => format!("Could not load events: {}\n", message),
    };
    out.push_str(&body);
    out
}

pub fn navbar(session: &Session) -> String {
    match session.identity() {
        Some(identity) => format!(
            "📅 EventHub   [My Events]   {}   [Logout]\n{}\n",
            identity.email, RULE
        ),
        None => format!("📅 EventHub\n{}\n", RULE),
    }
}

pub fn landing() -> String {
    "\
Welcome to EventHub
Your all-in-one solution for managing and tracking events

Stay organized with our intuitive event management platform. Track upcoming
events, get real-time countdowns, and never miss an important moment.

  [Get Started]  [Sign In]   (type 'auth')
"
    .to_string()
}

pub fn auth(mode: FormMode, error: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", mode.title());
    let _ = writeln!(
        out,
        "{}",
        match mode {
            FormMode::SignIn => "Sign in to access your events",
            FormMode::SignUp => "Sign up to get started",
        }
    );
    if let Some(error) = error {
        let _ = writeln!(out, "\n  ! {}", error);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  login <email> <password>");
    let _ = writeln!(out, "  signup <email> <password> <confirm-password>");
    let _ = writeln!(
        out,
        "  toggle  ({})",
        match mode {
            FormMode::SignIn => "Don't have an account? Sign up",
            FormMode::SignUp => "Already have an account? Sign in",
        }
    );
    out
}

pub fn events_list(events: &[Event], board: &CountdownBoard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "My Events");
    let _ = writeln!(out, "Stay updated with your upcoming events and never miss a moment\n");

    if events.is_empty() {
        let _ = writeln!(out, "No Events Yet");
        let _ = writeln!(out, "You don't have any events scheduled at the moment.");
        return out;
    }

    for event in events {
        let _ = writeln!(out, "[{}] {}", event.id, event.title);
        let _ = writeln!(out, "    {}", format_event_date(&event.start));
        let _ = writeln!(out, "    📍 {}", event.location);
        let _ = writeln!(out, "    {}", countdown_line(board, event));
        let _ = writeln!(out);
    }
    out
}

pub fn event_details(event: &Event, board: &CountdownBoard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "← Back to Events   (type 'events')\n");

    if let Some(category) = &event.category {
        let _ = writeln!(out, "<{}>", category);
    }
    let _ = writeln!(out, "{}", event.title);
    if !event.description.is_empty() {
        let _ = writeln!(out, "{}", event.description);
    }

    let _ = writeln!(out, "\nTime Until Event");
    let _ = writeln!(out, "  {}", countdown_line(board, event));

    let _ = writeln!(out, "\nDate & Time   {}", format_event_date(&event.start));
    let _ = writeln!(out, "Location      {}", event.location);
    if let Some(address) = &event.address {
        let _ = writeln!(out, "              {}", address);
    }
    if let Some(capacity) = &event.capacity {
        let _ = writeln!(out, "Capacity      {}", capacity);
    }
    if let Some(organizer) = &event.organizer {
        let _ = writeln!(out, "Organizer     {}", organizer);
    }
    if let Some(details) = &event.details {
        let _ = writeln!(out, "\nAbout This Event\n{}", details);
    }
    out
}

pub fn event_not_found() -> String {
    "\
Event Not Found
The event you're looking for doesn't exist.

  [Back to Events]   (type 'events')
"
    .to_string()
}

fn countdown_line(board: &CountdownBoard, event: &Event) -> String {
    match board.state(&event.id) {
        Some(state) => countdown(&state.remaining),
        None => String::new(),
    }
}

/// `3 Days : 04 Hours : 05 Minutes : 06 Seconds`, or the started notice
pub fn countdown(remaining: &Remaining) -> String {
    match remaining {
        Remaining::Expired => "Event has started!".to_string(),
        Remaining::Left(b) => b.to_string(),
    }
}
