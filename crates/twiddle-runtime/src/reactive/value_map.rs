#![forbid(unsafe_code)]

//! Fixed-shape records of observables.
//!
//! A value map groups related observables (a slider's `min`, `max` and
//! `pointer_scale`, a folder's `title` and `expanded`) under compile-time
//! keys. Fields are plain [`Observable`](super::Observable)s, so a map can be
//! assembled from observables that are also held elsewhere.

use super::emitter::Subscription;

/// Behavior shared by every record declared with [`value_map!`](crate::value_map).
pub trait ValueMap {
    /// Plain snapshot type with one field per key.
    type Object;

    /// Keys in declaration order.
    fn keys() -> &'static [&'static str];

    /// Current value of every field.
    fn snapshot(&self) -> Self::Object;

    /// Call `callback` with the key whenever any field changes.
    fn subscribe_any(&self, callback: impl Fn(&'static str) + Clone + 'static)
    -> Vec<Subscription>;
}

/// Declare a value map and its snapshot struct.
///
/// ```
/// use twiddle_runtime::value_map;
/// use twiddle_runtime::reactive::ValueMap;
///
/// value_map! {
///     pub struct SliderProps / SliderPropsObject {
///         min: f64,
///         max: f64,
///     }
/// }
///
/// let props = SliderProps::from_object(SliderPropsObject { min: 0.0, max: 10.0 });
/// props.max.set(20.0);
/// assert_eq!(props.snapshot().max, 20.0);
/// assert_eq!(SliderProps::keys(), &["min", "max"]);
/// ```
#[macro_export]
macro_rules! value_map {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident / $object:ident {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: $crate::reactive::Observable<$ty>, )*
        }

        #[doc = concat!("Plain snapshot of a [`", stringify!($name), "`].")]
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $object {
            $( pub $field: $ty, )*
        }

        impl $name {
            /// Keys in declaration order.
            pub const KEYS: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Create fresh observables from raw values.
            #[must_use]
            pub fn from_object(object: $object) -> Self {
                Self {
                    $( $field: $crate::reactive::Observable::new(object.$field), )*
                }
            }
        }

        impl $crate::reactive::ValueMap for $name {
            type Object = $object;

            fn keys() -> &'static [&'static str] {
                Self::KEYS
            }

            fn snapshot(&self) -> $object {
                $object {
                    $( $field: self.$field.get(), )*
                }
            }

            fn subscribe_any(
                &self,
                callback: impl Fn(&'static str) + Clone + 'static,
            ) -> Vec<$crate::reactive::Subscription> {
                vec![
                    $({
                        let cb = callback.clone();
                        self.$field.subscribe(move |_| cb(stringify!($field)))
                    },)*
                ]
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::ValueMap;
    use crate::reactive::Observable;
    use std::cell::RefCell;
    use std::rc::Rc;

    crate::value_map! {
        /// Test record.
        pub struct FolderProps / FolderPropsObject {
            title: String,
            expanded: bool,
        }
    }

    #[test]
    fn keys_follow_declaration_order() {
        assert_eq!(FolderProps::keys(), &["title", "expanded"]);
    }

    #[test]
    fn from_object_and_snapshot() {
        let props = FolderProps::from_object(FolderPropsObject {
            title: "Folder".into(),
            expanded: true,
        });
        props.expanded.set(false);
        assert_eq!(
            props.snapshot(),
            FolderPropsObject {
                title: "Folder".into(),
                expanded: false,
            }
        );
    }

    #[test]
    fn fields_can_share_existing_observables() {
        let expanded = Observable::new(true);
        let props = FolderProps {
            title: Observable::new(String::new()),
            expanded: expanded.clone(),
        };
        expanded.set(false);
        assert!(!props.expanded.get());
        assert!(props.expanded.ptr_eq(&expanded));
    }

    #[test]
    fn subscribe_any_reports_changed_key() {
        let props = FolderProps::from_object(FolderPropsObject {
            title: "a".into(),
            expanded: false,
        });
        let keys = Rc::new(RefCell::new(Vec::new()));
        let k = Rc::clone(&keys);
        let _subs = props.subscribe_any(move |key| k.borrow_mut().push(key));
        props.title.set("b".into());
        props.expanded.set(true);
        props.expanded.set(true);
        assert_eq!(*keys.borrow(), vec!["title", "expanded"]);
    }
}
