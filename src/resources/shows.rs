use super::{Accept, Fallback, Field, Resource};

pub static SHOWS: Resource = Resource {
    name: "Show",
    path: "/shows",
    collection: "shows.json",
    fields: &[
        Field { key: "title",           accept: Accept::Truthy, fallback: Fallback::Text("Untitled Show") },
        Field { key: "durationMinutes", accept: Accept::Number, fallback: Fallback::Number(60) },
        Field { key: "isSoldOut",       accept: Accept::Bool,   fallback: Fallback::Bool(false) },
        Field { key: "premiereDate",    accept: Accept::Truthy, fallback: Fallback::Now },
        Field { key: "performers",      accept: Accept::Array,  fallback: Fallback::EmptyArray },
    ],
};
