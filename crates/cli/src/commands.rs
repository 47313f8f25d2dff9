//! Command handlers. Client failures are reported as [`Alert`]s.

use anyhow::Result;
use chrono::{Duration, Utc};
use sprout_client::{Action, Alert, ClientContext, ClientError};
use sprout_core::models::notification::DEFAULT_SCHEDULE_OFFSET_HOURS;
use sprout_core::models::{Credentials, EntryDraft, Lot, NewLot, Notification, NotificationDraft};

use crate::cli::{
    Commands, CreateLotArgs, EntryArgs, JournalCommand, LotsCommand, NotificationsCommand,
    ReminderArgs,
};

fn alert(action: Action) -> impl FnOnce(ClientError) -> anyhow::Error {
    move |err| {
        tracing::debug!(error = %err, ?action, "Command failed");
        anyhow::anyhow!(Alert::from_error(action, &err))
    }
}

pub async fn dispatch(ctx: &ClientContext, command: Commands) -> Result<()> {
    match command {
        Commands::Register(args) => {
            let credentials = Credentials::new(args.email, args.password);
            ctx.auth()
                .register(&credentials, &args.confirm)
                .await
                .map_err(alert(Action::SignUp))?;
            println!("Registered and signed in as {}", credentials.email);
        }
        Commands::Login(args) => {
            let credentials = Credentials::new(args.email, args.password);
            ctx.auth()
                .login(&credentials)
                .await
                .map_err(alert(Action::SignIn))?;
            println!("Signed in as {}", credentials.email);
        }
        Commands::Logout => {
            ctx.auth().logout().await.map_err(alert(Action::SignIn))?;
            println!("Signed out");
        }
        Commands::Whoami => {
            let session = ctx.session();
            if !session.is_authenticated().await {
                println!("Not signed in");
            } else if let Some(at) = session.expires_at().await {
                println!("Signed in until {}", at.format("%Y-%m-%d %H:%M UTC"));
            } else {
                println!("Signed in");
            }
        }
        Commands::Catalog { search } => catalog(ctx, search).await?,
        Commands::Lots(cmd) => lots(ctx, cmd).await?,
        Commands::Journal(cmd) => journal(ctx, cmd).await?,
        Commands::Notifications(cmd) => notifications(ctx, cmd).await?,
    }
    Ok(())
}

async fn catalog(ctx: &ClientContext, search: Option<String>) -> Result<()> {
    let mut catalog = ctx.catalog();
    catalog.load().await.map_err(alert(Action::LoadCatalog))?;

    let entries = match search.as_deref() {
        Some(query) => catalog.search(query),
        None => catalog.entries().iter().collect(),
    };
    if entries.is_empty() {
        println!("No plants found");
    }
    for m in entries {
        let days = m.days_to_grow.as_deref().unwrap_or("?");
        let temperature = m.temperature.as_deref().unwrap_or("-");
        let light = m.light.as_deref().unwrap_or("-");
        println!(
            "{:>4}  {}  ({days} days, {temperature}, {light})",
            m.id, m.name
        );
    }
    Ok(())
}

async fn lots(ctx: &ClientContext, command: LotsCommand) -> Result<()> {
    let mut repo = ctx.lots();
    match command {
        LotsCommand::List => {
            let lots = repo.list_lots().await.map_err(alert(Action::LoadLots))?;
            if lots.is_empty() {
                println!("No lots yet");
            }
            for lot in lots {
                print_lot(lot);
            }
        }
        LotsCommand::Create(CreateLotArgs {
            microgreen_id,
            sowing_date,
            harvest_date,
            substrate,
        }) => {
            let microgreen = ctx
                .catalog()
                .get(microgreen_id)
                .await
                .map_err(alert(Action::CreateLot))?;
            repo.select_microgreen(microgreen);
            let lot = repo
                .create_lot(NewLot {
                    sowing_date,
                    substrate_type: substrate,
                    expected_harvest_date: harvest_date,
                })
                .await
                .map_err(alert(Action::CreateLot))?;
            print_lot(lot);
        }
        LotsCommand::Delete { id } => {
            repo.delete_lot(id).await.map_err(alert(Action::DeleteLot))?;
            println!("Deleted lot #{id}, {} remaining", repo.lots().len());
        }
    }
    Ok(())
}

fn print_lot(lot: &Lot) {
    println!(
        "#{:<5} {:<20} sown {}  harvest {}  substrate {}",
        lot.id,
        lot.microgreen.name,
        lot.sowing_date_display(),
        lot.harvest_date_display(),
        if lot.substrate_type.is_empty() { "-" } else { &lot.substrate_type },
    );
}

async fn journal(ctx: &ClientContext, command: JournalCommand) -> Result<()> {
    match command {
        JournalCommand::List { lot } => {
            let mut journal = ctx.journal(lot);
            let entries = journal.load().await.map_err(alert(Action::LoadJournal))?;
            if entries.is_empty() {
                println!("No entries for lot #{lot}");
            }
            for entry in entries {
                println!("{}  {}  {} cm", entry.id, entry.date_display(), entry.height);
                println!("    {}", entry.visual_changes);
                if !entry.watering.is_empty() {
                    println!("    watering: {}", entry.watering);
                }
                if !entry.lighting.is_empty() {
                    println!("    lighting: {}", entry.lighting);
                }
                if let Some(uri) = &entry.image_uri {
                    println!("    photo: {uri}");
                }
            }
            if let Some(uri) = journal.latest_image() {
                println!("Latest photo: {uri}");
            }
        }
        JournalCommand::Add(args) => {
            let lot = args.lot;
            let mut journal = ctx.journal(lot);
            journal.load().await.map_err(alert(Action::LoadJournal))?;

            let mut draft = entry_draft(args);
            let entry = journal
                .add_entry(&mut draft)
                .await
                .map_err(alert(Action::SaveJournalEntry))?;
            println!("Added entry {} to lot #{lot}", entry.id);
        }
        JournalCommand::Delete { lot, id } => {
            let mut journal = ctx.journal(lot);
            journal.load().await.map_err(alert(Action::LoadJournal))?;
            let removed = journal
                .delete_entry(&id)
                .await
                .map_err(alert(Action::DeleteJournalEntry))?;
            if removed {
                println!("Deleted entry {id}");
            } else {
                println!("No entry {id} in lot #{lot}");
            }
        }
        JournalCommand::AdoptLegacy { lot } => {
            let mut journal = ctx.journal(lot);
            let adopted = journal
                .adopt_legacy_entries()
                .await
                .map_err(alert(Action::SaveJournalEntry))?;
            println!("Adopted {adopted} entries into lot #{lot}");
        }
    }
    Ok(())
}

fn entry_draft(args: EntryArgs) -> EntryDraft {
    let mut draft = EntryDraft {
        height: args.height,
        visual_changes: args.changes,
        watering: args.watering,
        lighting: args.lighting,
        image_uri: args.image,
        ..EntryDraft::new()
    };
    if let Some(date) = args.date {
        draft.date = date.format("%Y-%m-%d").to_string();
    }
    draft
}

async fn notifications(ctx: &ClientContext, command: NotificationsCommand) -> Result<()> {
    let mut repo = ctx.notifications();
    repo.load().await.map_err(alert(Action::LoadNotifications))?;

    match command {
        NotificationsCommand::List { view } => {
            let items = match view {
                Some(view) => repo.filtered(view.into()),
                None => repo.list(),
            };
            if items.is_empty() {
                println!("No reminders");
            }
            for n in items {
                print_reminder(n);
            }
        }
        NotificationsCommand::Add(args) => {
            let notification = repo
                .add(reminder_draft(args))
                .await
                .map_err(alert(Action::SaveNotification))?;
            print_reminder(notification);
        }
        NotificationsCommand::Toggle { id } => {
            let found = repo
                .toggle(&id)
                .await
                .map_err(alert(Action::SaveNotification))?;
            match repo.get(&id) {
                Some(n) if found => print_reminder(n),
                _ => println!("No reminder {id}"),
            }
        }
        NotificationsCommand::Delete { id } => {
            let removed = repo
                .remove(&id)
                .await
                .map_err(alert(Action::SaveNotification))?;
            if removed {
                println!("Deleted reminder {id}");
            } else {
                println!("No reminder {id}");
            }
        }
        NotificationsCommand::Sync => {
            let merged = repo
                .sync_from_server(&ctx.api)
                .await
                .map_err(alert(Action::LoadNotifications))?;
            println!("Merged {merged} reminders, {} total", repo.len());
        }
    }
    Ok(())
}

fn reminder_draft(args: ReminderArgs) -> NotificationDraft {
    NotificationDraft {
        title: args.title,
        message: args.message,
        icon: args.icon,
        scheduled_date: args
            .at
            .unwrap_or_else(|| Utc::now() + Duration::hours(DEFAULT_SCHEDULE_OFFSET_HOURS)),
    }
}

fn print_reminder(n: &Notification) {
    let mark = if n.completed { "x" } else { " " };
    println!("[{mark}] {} {}  {}  ({})", n.icon, n.title, n.schedule_display(), n.id);
    println!("    {}", n.message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn entry_date_overrides_today() {
        let draft = entry_draft(EntryArgs {
            lot: 1,
            height: "2".into(),
            changes: "Leaves".into(),
            watering: String::new(),
            lighting: String::new(),
            image: None,
            date: NaiveDate::from_ymd_opt(2025, 1, 5),
        });
        assert_eq!(draft.date, "2025-01-05");
        assert_eq!(draft.visual_changes, "Leaves");
    }

    #[test]
    fn reminder_defaults_to_a_day_ahead() {
        let draft = reminder_draft(ReminderArgs {
            title: "Water".into(),
            message: "Tray".into(),
            icon: "💧".into(),
            at: None,
        });
        let ahead = draft.scheduled_date - Utc::now();
        assert!(ahead > Duration::hours(23));
        assert!(ahead <= Duration::hours(24));
    }

    #[test]
    fn client_errors_become_alerts() {
        let err = alert(Action::LoadLots)(ClientError::Unsupported("x"));
        assert_eq!(err.to_string(), "Error\nCould not load lots");
    }
}
