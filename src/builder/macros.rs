//! Macros for ergonomic chart construction.

/// Build a [`Behaviors`](crate::core::Behaviors) bag from `name: closure`
/// pairs.
///
/// Each closure takes the chart and the invocation and returns nothing;
/// dispatch always continues past it. Use
/// [`Behaviors::on_flow`](crate::core::Behaviors::on_flow) directly when a
/// handler needs to halt bubbling.
///
/// # Example
///
/// ```
/// use trellis::behaviors;
///
/// let bag = behaviors! {
///     enter: |_chart, _inv| println!("entering"),
///     play: |chart, _inv| { chart.go("playing"); },
/// };
///
/// assert!(bag.defines("enter"));
/// assert!(bag.defines("play"));
/// ```
#[macro_export]
macro_rules! behaviors {
    (
        $( $action:ident : $handler:expr ),* $(,)?
    ) => {
        $crate::core::Behaviors::new()
            $( .on(stringify!($action), $handler) )*
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn behaviors_macro_collects_handlers() {
        let bag = behaviors! {
            enter: |_, _| {},
            exit: |_, _| {},
            ping: |_, _| {},
        };

        assert_eq!(bag.len(), 3);
        assert!(bag.defines("enter"));
        assert!(bag.defines("exit"));
        assert!(bag.defines("ping"));
    }

    #[test]
    fn behaviors_macro_allows_empty_bag() {
        let bag = behaviors! {};

        assert!(bag.is_empty());
    }

    #[test]
    fn behaviors_macro_handlers_fire() {
        use crate::core::StateChart;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let hits = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&hits);

        let mut chart = StateChart::new();
        chart.declare("root -> a");
        chart.attach(
            "a",
            behaviors! {
                ping: move |_, _| { counted.fetch_add(1, Ordering::SeqCst); },
            },
        );

        chart.go("a").act("ping").act("ping");

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
