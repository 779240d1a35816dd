mod container;
mod liquid;
