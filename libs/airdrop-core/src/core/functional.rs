/// Every notification is handled only once, and so then can be moved!
/// The observer is reused for subsequent events, while each event is
/// consumed by the handler.
pub trait NotificationHandlerOnce<T>: Send + Sync {
    fn handle_notification(&self, notification: T);
}

impl<F, T> NotificationHandlerOnce<T> for F
where
    F: Fn(T) + Send + Sync,
{
    fn handle_notification(&self, notification: T) {
        (self)(notification)
    }
}

pub trait IntoNotificationHandlerOnceBox<T> {
    fn into_notification_handler_once_box(self) -> Box<dyn NotificationHandlerOnce<T>>;
}

pub trait PublishSingle<T> {
    fn publish_single(&self, notification: T);
}

pub struct SingleObserver<T> {
    observer: Option<Box<dyn NotificationHandlerOnce<T>>>,
}

impl<T> Default for SingleObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleObserver<T> {
    pub fn new() -> Self {
        Self { observer: None }
    }

    pub fn new_with_observer(observer: Box<dyn NotificationHandlerOnce<T>>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// There is only single observer that can be set, and so we call it 'set'
    pub fn set_observer(&mut self, observer: Box<dyn NotificationHandlerOnce<T>>) {
        self.observer = Some(observer);
    }

    pub fn set_observer_fn(&mut self, observer: impl NotificationHandlerOnce<T> + 'static) {
        self.set_observer(Box::new(observer));
    }

    pub fn set_observer_from(&mut self, observer: impl IntoNotificationHandlerOnceBox<T>) {
        self.observer = Some(observer.into_notification_handler_once_box());
    }
}

impl<T> PublishSingle<T> for SingleObserver<T> {
    /// There will be only one handler, and so we call it 'single'
    fn publish_single(&self, notification: T) {
        if let Some(observer) = &self.observer {
            observer.handle_notification(notification);
        }
    }
}

pub trait IntoObservableSingle<T>: Send + Sync {
    fn get_single_observer_mut(&mut self) -> &mut SingleObserver<T>;
}

pub mod crossbeam {
    use std::any::type_name;

    use crossbeam::channel::Sender;

    use crate::core::functional::{IntoNotificationHandlerOnceBox, NotificationHandlerOnce};

    impl<T> NotificationHandlerOnce<T> for Sender<T>
    where
        T: Send + Sync,
    {
        fn handle_notification(&self, notification: T) {
            if let Err(err) = self.send(notification) {
                tracing::warn!("Failed to send {}: {:?}", type_name::<T>(), err);
            }
        }
    }

    impl<T> IntoNotificationHandlerOnceBox<T> for Sender<T>
    where
        T: Send + Sync + 'static,
    {
        fn into_notification_handler_once_box(self) -> Box<dyn NotificationHandlerOnce<T>> {
            Box::new(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam::channel::unbounded;

    use crate::core::test_util::get_mock_channel;

    use super::{NotificationHandlerOnce, PublishSingle, SingleObserver};

    #[test]
    fn test_notification_handler_fn() {
        let _: Box<dyn NotificationHandlerOnce<i32>> = Box::new(|_: i32| {});
    }

    #[test]
    fn test_single_observer_fn() {
        let (tx, rx) = get_mock_channel::<i32>();
        let mut observer = SingleObserver::<i32>::new();
        observer.set_observer_fn(move |x: i32| {
            assert_eq!(tx.send(x), Ok(()));
        });
        observer.publish_single(10);
        assert_eq!(10, rx.recv().unwrap());
    }

    #[test]
    fn test_single_observer_from_crossbeam_sender() {
        let (tx, rx) = unbounded::<i32>();
        let mut observer = SingleObserver::<i32>::new();
        assert!(!observer.has_observer());
        observer.set_observer_from(tx);
        assert!(observer.has_observer());
        observer.publish_single(7);
        observer.publish_single(8);
        assert_eq!(vec![7, 8], rx.try_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_single_observer_without_handler() {
        let observer = SingleObserver::<i32>::new();
        observer.publish_single(1);
    }
}
