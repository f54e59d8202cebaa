pub const BANNER: &str = r"
   __       _            _
  / _| __ _| | _____  __| |_ __  ___
 | |_ / _` | |/ / _ \/ _` | '_ \/ __|
 |  _| (_| |   <  __/ (_| | | | \__ \
 |_|  \__,_|_|\_\___|\__,_|_| |_|___/
";
