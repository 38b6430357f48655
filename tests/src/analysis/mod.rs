mod events;
mod functions;
mod report;
mod search;
mod tree;
