//! Performers on the company's books.

use super::{Accept, Fallback, Field, Resource};

pub static ARTISTS: Resource = Resource {
    name: "Artist",
    path: "/artists",
    collection: "artists.json",
    fields: &[
        Field { key: "name",       accept: Accept::Truthy, fallback: Fallback::Text("Unknown Artist") },
        Field { key: "actType",    accept: Accept::Truthy, fallback: Fallback::Text("General") },
        Field { key: "isFullTime", accept: Accept::Bool,   fallback: Fallback::Bool(false) },
        Field { key: "hiredAt",    accept: Accept::Truthy, fallback: Fallback::Now },
        Field { key: "skills",     accept: Accept::Array,  fallback: Fallback::EmptyArray },
    ],
};
