pub mod batch;

pub mod coercion;

pub mod item;

pub mod mapper;

pub mod resolver;

pub mod schema;

pub mod validation;

pub mod value;
