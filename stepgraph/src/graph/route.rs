//! Closed route-key enumerations for conditional edges.
//!
//! A [`RouteKey`] lists every key a selector can return, so
//! `StateGraph::add_routed_edges` can build the complete route table at registration
//! and an unmapped key cannot occur at run time.

/// A closed set of route keys.
///
/// Usually declared with [`route_keys!`](crate::route_keys).
pub trait RouteKey: Copy + Send + Sync + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Stable key used in the route table, logs and diagrams.
    fn as_str(&self) -> &'static str;
}

impl RouteKey for bool {
    const ALL: &'static [Self] = &[true, false];

    fn as_str(&self) -> &'static str {
        if *self {
            "true"
        } else {
            "false"
        }
    }
}

/// Declares a route-key enum and implements [`RouteKey`] for it.
///
/// ```rust
/// stepgraph::route_keys! {
///     /// Loop control.
///     pub enum LoopRoute {
///         Continue => "continue",
///         End => "end",
///     }
/// }
///
/// use stepgraph::RouteKey;
/// assert_eq!(LoopRoute::ALL.len(), 2);
/// assert_eq!(LoopRoute::Continue.as_str(), "continue");
/// ```
#[macro_export]
macro_rules! route_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::RouteKey for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }
        }
    };
}
