use jobfinder_app_state::{ListenerId, NotificationId, NotificationKind, NotificationStore};
use parking_lot::Mutex;

/// Prints each notification once, when it is added. Unsubscribes on drop.
pub struct NotificationPrinter {
    store: NotificationStore,
    listener: ListenerId,
}

pub fn print_notifications(store: &NotificationStore) -> NotificationPrinter {
    let last_printed: Mutex<Option<NotificationId>> = Mutex::new(None);
    let listener = store.state().subscribe(move |items| {
        let mut last = last_printed.lock();
        let threshold = *last;
        for item in items.iter().filter(|item| Some(item.id) > threshold) {
            match item.kind {
                NotificationKind::Error | NotificationKind::Warning => {
                    eprintln!("[{}] {}", item.kind, item.message)
                }
                NotificationKind::Success | NotificationKind::Info => {
                    println!("[{}] {}", item.kind, item.message)
                }
            }
            *last = Some(item.id);
        }
    });
    NotificationPrinter {
        store: store.clone(),
        listener,
    }
}

impl Drop for NotificationPrinter {
    fn drop(&mut self) {
        self.store.state().unsubscribe(self.listener);
    }
}
