pub mod chunk;
pub mod ignore;
