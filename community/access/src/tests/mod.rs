mod permission;
