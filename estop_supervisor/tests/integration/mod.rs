mod helpers;

mod scenario_replay;
mod stop_outputs;
mod timers;
